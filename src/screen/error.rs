// ABOUTME: Error types for screen session management
// Defines error conditions that can occur while driving screen over a shell connection

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScreenError {
    #[error("No active connection to a remote shell")]
    NotConnected,

    #[error("Timed out waiting for {expected:?}")]
    Timeout { expected: String },

    #[error("Connection closed before the expected output arrived")]
    ConnectionClosed,

    #[error("Remote host kept asking for a password after {attempts} attempts")]
    PasswordPrompt { attempts: u32 },

    #[error("PTY creation failed: {0}")]
    PtyCreationFailed(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Ambiguous session '{query}'. Matches: {}", matches.join(", "))]
    AmbiguousSession { query: String, matches: Vec<String> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
