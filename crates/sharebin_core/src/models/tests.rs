//! Model-level unit tests.

use super::*;
use chrono::{Duration, Utc};
use serde_json::json;

#[test]
fn test_paste_file_derived_counts() {
    let file = paste::PasteFile::new(0, None, None, "a\nb\nc".to_string());
    assert_eq!(file.loc, 3);
    assert_eq!(file.charcount, 5);

    let single = paste::PasteFile::new(0, None, None, "héllo".to_string());
    assert_eq!(single.loc, 1);
    assert_eq!(single.charcount, 5);

    let trailing = paste::PasteFile::new(0, None, None, "line\n".to_string());
    assert_eq!(trailing.loc, 2);
}

#[test]
fn test_paste_file_default_filename() {
    let unnamed = paste::PasteFile::new(3, None, None, "x".to_string());
    assert_eq!(unnamed.filename, "file_3");

    let blank = paste::PasteFile::new(1, Some("   ".to_string()), None, "x".to_string());
    assert_eq!(blank.filename, "file_1");

    let named = paste::PasteFile::new(0, Some(" notes.md ".to_string()), None, "x".to_string());
    assert_eq!(named.filename, "notes.md");
}

#[test]
fn test_normalize_syntax() {
    assert_eq!(paste::normalize_syntax(Some(" Rust ")), Some("rust".to_string()));
    assert_eq!(paste::normalize_syntax(Some("   ")), None);
    assert_eq!(paste::normalize_syntax(None), None);
}

#[test]
fn test_paste_new_has_fresh_identity() {
    let first = paste::Paste::new(Vec::new());
    let second = paste::Paste::new(Vec::new());
    assert_ne!(first.id, second.id);
    assert_ne!(first.safety, second.safety);
    assert_eq!(first.views, 0);
    assert!(!first.has_password());
    assert!(first.expires_at.is_none());
}

#[test]
fn test_paste_expiry_boundary() {
    let now = Utc::now();
    let mut paste = paste::Paste::new(Vec::new());
    assert!(!paste.is_expired_at(now));

    paste.expires_at = Some(now);
    assert!(paste.is_expired_at(now));
    assert!(!paste.is_expired_at(now - Duration::seconds(1)));
}

#[test]
fn test_paste_debug_redacts_secrets() {
    let mut paste = paste::Paste::new(Vec::new());
    paste.password_hash = Some("$argon2id$secret-hash".to_string());
    let rendered = format!("{:?}", paste);
    assert!(rendered.contains(&paste.id));
    assert!(!rendered.contains(&paste.safety));
    assert!(!rendered.contains("secret-hash"));
    assert!(rendered.contains("has_password: true"));
}

#[test]
fn test_submission_distinguishes_missing_and_null_content() {
    let submission: paste::PasteSubmission = serde_json::from_value(json!({
        "files": [{"filename": "a"}, {"content": null}, {"content": "x"}]
    }))
    .unwrap();
    let files = submission.files.unwrap();
    assert_eq!(files[0].content, None);
    assert_eq!(files[1].content, Some(None));
    assert_eq!(files[2].content, Some(Some("x".to_string())));
}

#[test]
fn test_submission_parses_rfc3339_expiry() {
    let submission: paste::PasteSubmission = serde_json::from_value(json!({
        "files": [],
        "expires": "2030-01-01T00:00:00Z",
        "password": "pw"
    }))
    .unwrap();
    assert_eq!(
        submission.expires.unwrap().to_rfc3339(),
        "2030-01-01T00:00:00+00:00"
    );
    assert_eq!(submission.password.as_deref(), Some("pw"));
}

#[test]
fn test_submission_from_text() {
    let submission = paste::PasteSubmission::from_text("plain body");
    let files = submission.files.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].content, Some(Some("plain body".to_string())));
    assert!(files[0].filename.is_none());
}

#[test]
fn test_paste_view_hides_secrets() {
    let mut paste = paste::Paste::new(vec![paste::PasteFile::new(
        0,
        None,
        Some("Python".to_string()),
        "print(1)".to_string(),
    )]);
    paste.password_hash = Some("hash".to_string());
    let value = serde_json::to_value(paste::PasteView::from(&paste)).unwrap();

    assert_eq!(value["id"], paste.id);
    assert_eq!(value["has_password"], true);
    assert_eq!(value["files"][0]["syntax"], "python");
    assert!(value.get("safety").is_none());
    assert!(value.get("password_hash").is_none());
}

#[test]
fn test_paste_view_relative_times() {
    let now = Utc::now();
    let mut paste = paste::Paste::new(Vec::new());
    paste.created_at = now - Duration::hours(3);
    paste.expires_at = Some(now + Duration::days(2));

    let view = paste::PasteView::at(&paste, now);
    assert_eq!(view.created_ago, "3 hours ago");
    assert_eq!(view.expires_in.as_deref(), Some("2 days from now"));

    paste.expires_at = None;
    assert!(paste::PasteView::at(&paste, now).expires_in.is_none());
}

#[test]
fn test_created_paste_carries_safety_token() {
    let paste = paste::Paste::new(Vec::new());
    let value = serde_json::to_value(paste::CreatedPaste::from(&paste)).unwrap();
    assert_eq!(value["safety"], paste.safety);
    assert_eq!(value["expires"], serde_json::Value::Null);
}

#[test]
fn test_user_token_is_not_serialized() {
    let user = user::User::new(9, "carol", true);
    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["username"], "carol");
    assert_eq!(value["admin"], true);
    assert!(value.get("token").is_none());
    assert!(!format!("{:?}", user).contains(&user.token));
}

#[test]
fn test_user_with_token_keeps_supplied_token() {
    let user = user::User::with_token(1, "admin", true, "operator-token");
    assert_eq!(user.token, "operator-token");
    assert_eq!(user.username, "admin");
    assert!(user.admin);
}
