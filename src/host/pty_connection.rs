// ABOUTME: Shell connection running inside a pseudo-terminal
//
// Spawns the shell command (local shell or ssh) in a PTY via portable-pty and
// provides:
// - keystroke sending
// - escape-free output matching with optional deadlines
// - an interactive hand-off that wires the PTY to the local terminal

use crate::host::Connection;
use crate::screen::ScreenError;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use lazy_static::lazy_static;
use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use regex::Regex;
use std::io::{self, Read, Write};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

lazy_static! {
    /// Complete CSI, OSC and two/three byte escape sequences
    static ref ANSI_ESCAPE: Regex =
        Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[ -/]*[0-~])").unwrap();
    /// An escape sequence cut off at the end of the text
    static ref PARTIAL_ESCAPE: Regex =
        Regex::new(r"\x1b(?:\[[0-?]*[ -/]*|\][^\x07\x1b]*\x1b?|[ -/]*)$").unwrap();
    /// Control characters other than tab, newline and carriage return
    static ref CONTROL_CHARS: Regex =
        Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").unwrap();
}

/// Longest escape tail held back waiting for the rest of the sequence
const MAX_HELD_ESCAPE: usize = 256;
const READ_CHUNK: usize = 4096;

/// Remove terminal escape sequences and stray control characters
pub fn strip_escapes(text: &str) -> String {
    let without_escapes = ANSI_ESCAPE.replace_all(text, "");
    CONTROL_CHARS.replace_all(&without_escapes, "").into_owned()
}

/// Decoded, escape-free PTY output waiting to be matched
#[derive(Debug, Default)]
pub struct OutputBuffer {
    /// Bytes of an unfinished UTF-8 character
    raw: Vec<u8>,
    /// Text of an unfinished escape sequence
    held: String,
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk as read from the PTY
    pub fn push(&mut self, chunk: &[u8]) {
        self.raw.extend_from_slice(chunk);

        let decoded = match std::str::from_utf8(&self.raw) {
            Ok(text) => {
                let text = text.to_string();
                self.raw.clear();
                text
            }
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.raw[..valid]).into_owned();
                self.raw.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.raw).into_owned();
                self.raw.clear();
                text
            }
        };

        let mut combined = std::mem::take(&mut self.held);
        combined.push_str(&decoded);

        let split = PARTIAL_ESCAPE
            .find(&combined)
            .map(|m| m.start())
            .filter(|start| combined.len() - start <= MAX_HELD_ESCAPE)
            .unwrap_or(combined.len());

        self.text.push_str(&strip_escapes(&combined[..split]));
        self.held = combined[split..].to_string();
    }

    /// Move anything held back into the text; false when nothing was pending
    pub fn flush_pending(&mut self) -> bool {
        if self.raw.is_empty() && self.held.is_empty() {
            return false;
        }
        let mut rest = std::mem::take(&mut self.held);
        rest.push_str(&String::from_utf8_lossy(&self.raw));
        self.raw.clear();
        self.text.push_str(&strip_escapes(&rest));
        true
    }

    /// Drop text up to and including `needle`; false when it has not arrived
    pub fn consume_through(&mut self, needle: &str) -> bool {
        match self.text.find(needle) {
            Some(pos) => {
                self.text.drain(..pos + needle.len());
                true
            }
            None => false,
        }
    }

    /// Take text before the earliest terminator and drop the terminator
    ///
    /// Returns the text together with the index of the matching terminator.
    pub fn take_until(&mut self, terminators: &[String]) -> Option<(String, usize)> {
        let (pos, index) = terminators
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_empty())
            .filter_map(|(index, t)| self.text.find(t.as_str()).map(|pos| (pos, index)))
            .min_by_key(|(pos, _)| *pos)?;

        let before = self.text[..pos].to_string();
        self.text.drain(..pos + terminators[index].len());
        Some((before, index))
    }

    /// Everything not yet consumed
    pub fn take_all(&mut self) -> String {
        self.flush_pending();
        std::mem::take(&mut self.text)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// A shell process attached to a pseudo-terminal
pub struct PtyConnection {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    buffer: OutputBuffer,
    read_timeout: Option<Duration>,
}

impl std::fmt::Debug for PtyConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyConnection")
            .field("buffered", &self.buffer.as_str().len())
            .field("read_timeout", &self.read_timeout)
            .finish_non_exhaustive()
    }
}

impl PtyConnection {
    /// Spawn `command` (program followed by its arguments) in a new PTY
    ///
    /// # Arguments
    /// * `command` - Program and arguments, e.g. `["ssh", "-t", "host"]`
    /// * `read_timeout` - Upper bound for each wait/read, `None` to wait forever
    pub fn spawn(command: &[String], read_timeout: Option<Duration>) -> Result<Self, ScreenError> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| ScreenError::PtyCreationFailed("empty shell command".to_string()))?;

        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(local_size())
            .map_err(|e| ScreenError::PtyCreationFailed(e.to_string()))?;

        let mut cmd = CommandBuilder::new(program);
        cmd.args(args);
        if let Ok(cwd) = std::env::current_dir() {
            cmd.cwd(cwd);
        }

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| ScreenError::PtyCreationFailed(e.to_string()))?;
        // The child holds its own handle to the slave side
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| ScreenError::PtyCreationFailed(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| ScreenError::PtyCreationFailed(e.to_string()))?;

        let (output_tx, output_rx) = mpsc::unbounded_channel();
        std::thread::spawn(move || forward_output(reader, &output_tx));

        info!(command = ?command, "Spawned shell in PTY");

        Ok(Self {
            master: pair.master,
            child,
            writer,
            output_rx,
            buffer: OutputBuffer::new(),
            read_timeout,
        })
    }

    fn deadline(&self) -> Option<Instant> {
        self.read_timeout.map(|timeout| Instant::now() + timeout)
    }

    /// Pull the next chunk of output into the buffer
    async fn fill(&mut self, expected: &str, deadline: Option<Instant>) -> Result<(), ScreenError> {
        let next = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, self.output_rx.recv())
                .await
                .map_err(|_| ScreenError::Timeout {
                    expected: expected.to_string(),
                })?,
            None => self.output_rx.recv().await,
        };

        match next {
            Some(chunk) => {
                self.buffer.push(&chunk);
                Ok(())
            }
            None if self.buffer.flush_pending() => Ok(()),
            None => Err(ScreenError::ConnectionClosed),
        }
    }

    /// Hand the PTY to the operator until the shell exits
    ///
    /// Stdin is copied into the PTY from a background thread and PTY output
    /// goes straight to stdout, escape sequences included.
    pub async fn interact(mut self) -> Result<(), ScreenError> {
        let mut stdout = io::stdout();
        let leftover = self.buffer.take_all();
        stdout.write_all(leftover.as_bytes())?;
        stdout.flush()?;

        let _raw_mode = RawModeGuard::enable()?;
        self.nudge_redraw();

        let mut writer = self.writer;
        std::thread::spawn(move || {
            let mut stdin = io::stdin();
            let mut buf = [0u8; 1024];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if writer.write_all(&buf[..n]).and_then(|()| writer.flush()).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                    Err(_) => break,
                }
            }
        });

        while let Some(chunk) = self.output_rx.recv().await {
            stdout.write_all(&chunk)?;
            stdout.flush()?;
        }

        match self.child.wait() {
            Ok(status) => info!(?status, "Shell exited"),
            Err(e) => warn!("Failed to collect shell exit status: {}", e),
        }
        Ok(())
    }

    /// Stop the shell without handing it to the operator
    pub fn close(mut self) {
        if let Err(e) = self.child.kill() {
            debug!("Shell already gone: {}", e);
        }
        let _ = self.child.wait();
    }

    /// Wiggle the PTY size so full-screen programs repaint for the operator
    fn nudge_redraw(&self) {
        let size = local_size();
        let shrunk = PtySize {
            rows: size.rows.saturating_sub(1).max(1),
            ..size
        };
        for size in [shrunk, size] {
            if let Err(e) = self.master.resize(size) {
                debug!("PTY resize failed: {}", e);
            }
        }
    }
}

impl Connection for PtyConnection {
    fn is_connected(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    async fn send(&mut self, text: &str) -> Result<(), ScreenError> {
        debug!(text = %text.escape_debug(), "Sending to shell");
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    async fn wait_for(&mut self, needle: &str) -> Result<(), ScreenError> {
        let deadline = self.deadline();
        while !self.buffer.consume_through(needle) {
            self.fill(needle, deadline).await?;
        }
        Ok(())
    }

    async fn read_until(&mut self, terminators: &[String]) -> Result<(String, usize), ScreenError> {
        let deadline = self.deadline();
        loop {
            if let Some((text, index)) = self.buffer.take_until(terminators) {
                debug!(bytes = text.len(), terminator = index, "Read shell output");
                return Ok((text, index));
            }
            self.fill(&terminators.join(" | "), deadline).await?;
        }
    }
}

fn forward_output(mut reader: Box<dyn Read + Send>, output_tx: &mpsc::UnboundedSender<Vec<u8>>) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                if output_tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            // EIO once the child side is gone
            Err(_) => break,
        }
    }
}

/// Size of the operator's terminal, 80x24 when unknown
fn local_size() -> PtySize {
    let (cols, rows) = crossterm::terminal::size()
        .ok()
        .filter(|(cols, rows)| *cols > 0 && *rows > 0)
        .unwrap_or((80, 24));
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}
