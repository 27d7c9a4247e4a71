// ABOUTME: Numbered selection menu over the listed screen sessions
//
// Renders the listing as a numbered menu and interprets the operator's
// answer as "new session", "attach to entry N" or an invalid choice.

use crate::screen::listing::find_sid;

/// Title used for every menu dialog
pub const MENU_TITLE: &str = "Screen Manager";

/// Input that selects "new session" besides blank input
const NEW_SESSION_INPUT: &str = "0";

/// What the operator picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    /// Create a new session
    NewSession,
    /// Attach to the session at this zero-based position
    Existing(usize),
    /// Anything outside the offered range
    Invalid,
}

/// Menu built from one listing, numbered from 1 in listing order
#[derive(Debug, Clone, Default)]
pub struct SessionMenu {
    entries: Vec<String>,
}

impl SessionMenu {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let entries = labels
            .iter()
            .enumerate()
            .map(|(n, label)| format!("{}) {}", n + 1, label.as_ref()))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Prompt text shown to the operator
    pub fn render(&self) -> String {
        format!(
            "SELECTION:\n\n0) NEW SCREEN (or blank)\n{}",
            self.entries.join("\n")
        )
    }

    /// Interpret the operator's answer
    ///
    /// Only plain decimal digits count as a number, and the range check is
    /// numeric, so `10` is valid in a menu of ten or more sessions.
    pub fn select(&self, choice: &str) -> MenuSelection {
        if choice.is_empty() || choice == NEW_SESSION_INPUT {
            return MenuSelection::NewSession;
        }

        if !choice.bytes().all(|b| b.is_ascii_digit()) {
            return MenuSelection::Invalid;
        }

        match choice.parse::<usize>() {
            Ok(n) if (1..=self.entries.len()).contains(&n) => MenuSelection::Existing(n - 1),
            _ => MenuSelection::Invalid,
        }
    }

    /// Session id for the entry at `index`
    pub fn session_id(&self, index: usize) -> String {
        find_sid(&self.entries, index)
    }
}
