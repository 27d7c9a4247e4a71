// ABOUTME: Line-based operator dialogs on the local terminal
//
// Prompts print their text and read a single line; notices just print.

use crate::host::Dialog;
use crate::screen::ScreenError;
use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

/// `Dialog` over a reader/writer pair, stdin/stdout by default
pub struct TerminalDialog<R, W> {
    input: R,
    output: W,
}

impl TerminalDialog<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalDialog<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, mostly for inspecting what was printed
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Dialog for TerminalDialog<R, W> {
    fn prompt(&mut self, message: &str, title: &str) -> Result<String, ScreenError> {
        if !title.is_empty() {
            writeln!(self.output, "== {title} ==")?;
        }
        writeln!(self.output, "{message}")?;
        write!(self.output, "> ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;

        // Keep everything the operator typed except the line ending
        let answer = line.trim_end_matches(['\n', '\r']).to_string();
        tracing::debug!(title, answer = %answer, "Prompt answered");
        Ok(answer)
    }

    fn message_box(&mut self, message: &str) -> Result<(), ScreenError> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        Ok(())
    }
}
