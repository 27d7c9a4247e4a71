// ABOUTME: Capabilities the session manager needs from its environment
//
// The manager never touches a terminal or process directly. It talks to:
// - a `Connection` to the shell it types commands into
// - a `Dialog` for blocking prompts and notices to the operator

pub mod pty_connection;
pub mod terminal_dialog;

pub use pty_connection::PtyConnection;
pub use terminal_dialog::TerminalDialog;

use crate::screen::ScreenError;

/// A live shell that accepts keystrokes and produces text
#[allow(async_fn_in_trait)]
pub trait Connection {
    /// Whether the shell on the other side is still running
    fn is_connected(&mut self) -> bool;

    /// Type `text` into the shell as-is
    async fn send(&mut self, text: &str) -> Result<(), ScreenError>;

    /// Consume output up to and including `needle`
    async fn wait_for(&mut self, needle: &str) -> Result<(), ScreenError>;

    /// Return output up to the earliest of `terminators`, consuming the terminator
    ///
    /// The second value is the index of the terminator that matched.
    async fn read_until(&mut self, terminators: &[String]) -> Result<(String, usize), ScreenError>;
}

/// Blocking operator interaction
#[cfg_attr(test, mockall::automock)]
pub trait Dialog {
    /// Ask for a line of text; an empty string when nothing was entered
    fn prompt(&mut self, message: &str, title: &str) -> Result<String, ScreenError>;

    /// Show a notice
    fn message_box(&mut self, message: &str) -> Result<(), ScreenError>;
}
