// ABOUTME: Behavioral tests for listing when the host asks for a password
//
// A prompt is interrupted and the listing retried; retries are bounded and
// end with a notice to the operator.

use super::fixtures::{ScriptedDialog, ScriptedShell, TWO_SESSIONS};
use pretty_assertions::assert_eq;
use screen_manager::config::AppConfig;
use screen_manager::screen::{ScreenError, ScreenManager};

const LIST: &str = "sudo screen -ls | grep '^\\s'\r";

#[tokio::test]
async fn test_listing_recovers_after_one_prompt() {
    // Index 2 is the first password prompt after the two shell prompts
    let mut shell = ScriptedShell::with_reads(&[
        ("\r\n[sudo] ", 2),
        ("^C\r\n", 0),
        (TWO_SESSIONS, 0),
    ]);
    let mut dialog = ScriptedDialog::default();

    let labels = ScreenManager::new(&mut shell, &mut dialog, &AppConfig::default())
        .list_sessions()
        .await
        .unwrap();

    assert_eq!(labels, vec!["1111.js_alpha", "2222.js_beta"]);
    assert_eq!(shell.sent, vec![LIST, "\x03", LIST]);
    assert!(dialog.messages.is_empty());
}

#[tokio::test]
async fn test_password_text_in_output_triggers_retry() {
    let mut shell = ScriptedShell::with_reads(&[
        ("sudo: a password is required\r\n", 0),
        (TWO_SESSIONS, 0),
    ]);
    let mut dialog = ScriptedDialog::default();

    let labels = ScreenManager::new(&mut shell, &mut dialog, &AppConfig::default())
        .list_sessions()
        .await
        .unwrap();

    assert_eq!(labels.len(), 2);
    assert_eq!(shell.sent, vec![LIST, LIST]);
}

#[tokio::test]
async fn test_endless_prompts_give_up() {
    let mut config = AppConfig::default();
    config.shell.max_password_retries = 2;
    let mut shell = ScriptedShell::with_reads(&[
        ("password required", 0),
        ("password required", 0),
        ("password required", 0),
        (TWO_SESSIONS, 0),
    ]);
    let mut dialog = ScriptedDialog::default();

    let err = ScreenManager::new(&mut shell, &mut dialog, &config)
        .list_sessions()
        .await
        .unwrap_err();

    assert!(matches!(err, ScreenError::PasswordPrompt { attempts: 3 }));
    assert_eq!(shell.sent.len(), 3);
    assert_eq!(dialog.messages.len(), 1);
    // The fourth read was never needed
    assert_eq!(shell.reads.len(), 1);
}

#[tokio::test]
async fn test_closed_connection_is_an_error() {
    let mut shell = ScriptedShell::with_reads(&[]);
    let mut dialog = ScriptedDialog::default();

    let err = ScreenManager::new(&mut shell, &mut dialog, &AppConfig::default())
        .list_sessions()
        .await
        .unwrap_err();

    assert!(matches!(err, ScreenError::ConnectionClosed));
}
