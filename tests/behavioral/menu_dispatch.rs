// ABOUTME: Behavioral tests for the interactive menu flow
//
// One full run per case: connection check, listing, menu, then the action
// the operator's answer selects.

use super::fixtures::{test_date, ScriptedDialog, ScriptedShell, TWO_SESSIONS};
use pretty_assertions::assert_eq;
use screen_manager::cli::attach::attach_to;
use screen_manager::config::AppConfig;
use screen_manager::screen::{Outcome, ScreenError, ScreenManager};

async fn run_menu(shell: &mut ScriptedShell, dialog: &mut ScriptedDialog) -> Outcome {
    ScreenManager::new(shell, dialog, &AppConfig::default())
        .with_date(test_date())
        .run()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_menu_lists_sessions_in_listing_order() {
    let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
    let mut dialog = ScriptedDialog::answering(&["1"]);

    run_menu(&mut shell, &mut dialog).await;

    let (message, title) = &dialog.prompts[0];
    assert_eq!(title, "Screen Manager");
    assert_eq!(
        message,
        "SELECTION:\n\n0) NEW SCREEN (or blank)\n1) 1111.js_alpha\n2) 2222.js_beta"
    );
}

#[tokio::test]
async fn test_numbered_choice_attaches() {
    let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
    let mut dialog = ScriptedDialog::answering(&["1"]);

    let outcome = run_menu(&mut shell, &mut dialog).await;

    assert_eq!(outcome, Outcome::Attached { session_id: "1111".to_string() });
    assert!(shell.typed().ends_with("sudo screen -rx 1111\r"));
    assert!(dialog.messages.is_empty());
}

#[tokio::test]
async fn test_blank_and_zero_both_start_creation() {
    for answer in ["", "0"] {
        let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
        let mut dialog = ScriptedDialog::answering(&[answer, "scratch"]);

        let outcome = run_menu(&mut shell, &mut dialog).await;

        assert_eq!(outcome, Outcome::Created { session_name: "js_scratch".to_string() });
        assert_eq!(dialog.prompts.len(), 2, "answer {answer:?}");
    }
}

#[tokio::test]
async fn test_out_of_range_and_garbage_choices_are_rejected() {
    for answer in ["3", "-1", "abc", "1.5", " 1"] {
        let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
        let mut dialog = ScriptedDialog::answering(&[answer]);

        let outcome = run_menu(&mut shell, &mut dialog).await;

        assert_eq!(outcome, Outcome::InvalidChoice { choice: answer.to_string() });
        assert_eq!(dialog.messages, vec!["Invalid choice"]);
        // Only the listing was typed
        assert_eq!(shell.sent.len(), 1, "answer {answer:?}");
    }
}

#[tokio::test]
async fn test_tenth_session_is_selectable() {
    let listing: String = (1..=10)
        .map(|n| format!("\t{}.js_s{n}\t(Detached)\r\n", 1000 + n))
        .collect();
    let mut shell = ScriptedShell::with_listing(&listing);
    let mut dialog = ScriptedDialog::answering(&["10"]);

    let outcome = run_menu(&mut shell, &mut dialog).await;

    assert_eq!(outcome, Outcome::Attached { session_id: "1010".to_string() });
}

#[tokio::test]
async fn test_disconnected_run_only_shows_error() {
    let mut shell = ScriptedShell::default();
    let mut dialog = ScriptedDialog::default();

    let outcome = run_menu(&mut shell, &mut dialog).await;

    assert_eq!(outcome, Outcome::NotConnected);
    assert!(shell.sent.is_empty());
    assert!(dialog.prompts.is_empty());
    assert_eq!(dialog.messages.len(), 1);
    assert!(dialog.messages[0].starts_with("Error."));
}

#[tokio::test]
async fn test_attach_by_name_prefix() {
    let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
    let mut dialog = ScriptedDialog::default();
    let mut manager = ScreenManager::new(&mut shell, &mut dialog, &AppConfig::default());

    let outcome = attach_to(&mut manager, "js_b").await.unwrap();

    assert_eq!(outcome, Outcome::Attached { session_id: "2222".to_string() });
}

#[tokio::test]
async fn test_attach_with_ambiguous_prefix_fails() {
    let mut shell = ScriptedShell::with_listing(TWO_SESSIONS);
    let mut dialog = ScriptedDialog::default();
    let mut manager = ScreenManager::new(&mut shell, &mut dialog, &AppConfig::default());

    let err = attach_to(&mut manager, "js_").await.unwrap_err();

    match err.downcast_ref::<ScreenError>() {
        Some(ScreenError::AmbiguousSession { matches, .. }) => {
            assert_eq!(matches, &vec!["1111.js_alpha".to_string(), "2222.js_beta".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing but the listing was typed
    assert_eq!(shell.sent.len(), 1);
}
