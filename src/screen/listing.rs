// ABOUTME: Parsing of `screen -ls` output into session labels
//
// Turns the loosely structured listing text into ordered `<pid>.<name>`
// labels, and pulls the pid back out of a label or menu entry.

use crate::screen::error::ScreenError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

const DETACHED_MARKER: &str = " (Detached) ";
const ATTACHED_MARKER: &str = " (Attached) ";

lazy_static! {
    static ref MENU_MARKER: Regex = Regex::new(r"^\d+\) ").unwrap();
}

/// Strip everything out of the listing output except the `<pid>.<name>` labels
///
/// Whitespace is collapsed first, so the state markers are the only reliable
/// line boundaries. Whatever follows the last marker (socket summary, prompt
/// remnants) is discarded, as is everything from the first `[` onward.
pub fn clean_list(raw: &str) -> Vec<String> {
    let mut collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.push(' ');

    let split = collapsed
        .replace(DETACHED_MARKER, "\n")
        .replace(ATTACHED_MARKER, "\n");

    let mut segments: Vec<&str> = split.split('\n').collect();
    // Never terminated by a marker
    segments.pop();

    let mut labels = Vec::with_capacity(segments.len());
    for segment in segments {
        if let Some((head, _)) = segment.split_once('[') {
            push_label(&mut labels, head);
            break;
        }
        push_label(&mut labels, segment);
    }
    labels
}

fn push_label(labels: &mut Vec<String>, segment: &str) {
    let label = segment.trim();
    if !label.is_empty() {
        labels.push(label.to_string());
    }
}

/// Extract the session id from the entry at `index`
///
/// Works on bare labels (`1234.foo`) as well as numbered menu entries
/// (`3) 1234.foo`): the part before the first `.` is kept and the menu
/// marker is removed. An out of range index yields an empty id.
pub fn find_sid<S: AsRef<str>>(entries: &[S], index: usize) -> String {
    let Some(entry) = entries.get(index) else {
        return String::new();
    };
    let head = entry.as_ref().split('.').next().unwrap_or_default();
    MENU_MARKER.replace(head, "").into_owned()
}

/// One session from the listing, split into its parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedSession {
    /// Full `<pid>.<name>` label as listed
    pub label: String,
    /// Process id used to attach
    pub id: String,
    /// Session name as given at creation
    pub name: String,
}

impl ListedSession {
    pub fn from_label(label: &str) -> Self {
        let (id, name) = label.split_once('.').unwrap_or((label, ""));
        Self {
            label: label.to_string(),
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Find a listed session by pid, full label, name, or unique name prefix
///
/// Matching priority:
/// 1. Exact pid
/// 2. Exact label or exact name
/// 3. Name prefix (must be unique)
pub fn resolve_session<'a>(
    sessions: &'a [ListedSession],
    query: &str,
) -> Result<&'a ListedSession, ScreenError> {
    if let Some(session) = sessions.iter().find(|s| s.id == query) {
        return Ok(session);
    }

    if let Some(session) = sessions.iter().find(|s| s.label == query || s.name == query) {
        return Ok(session);
    }

    let matches: Vec<&ListedSession> =
        sessions.iter().filter(|s| s.name.starts_with(query)).collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(ScreenError::SessionNotFound(query.to_string())),
        _ => Err(ScreenError::AmbiguousSession {
            query: query.to_string(),
            matches: matches.iter().map(|s| s.label.clone()).collect(),
        }),
    }
}
