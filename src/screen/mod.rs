// ABOUTME: GNU screen session management over a shell connection
//
// Lists sessions through `screen -ls`, presents them as a numbered menu and
// either attaches to one or creates a new session that quits itself after
// a configured delay.

pub mod commands;
pub mod error;
pub mod listing;
pub mod manager;
pub mod menu;

pub use commands::{CreatePlan, ScreenCommands};
pub use error::ScreenError;
pub use listing::{clean_list, find_sid, resolve_session, ListedSession};
pub use manager::{Outcome, ScreenManager};
pub use menu::{MenuSelection, SessionMenu};
