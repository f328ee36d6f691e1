//! Unit tests for `AppError` display format.

use helpdesk_bot::AppError;

#[test]
fn display_prefixes_name_the_failure_kind() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::Slack("x".into()), "slack: x"),
        (AppError::State("x".into()), "state: x"),
        (AppError::Correlation("x".into()), "correlation: x"),
        (AppError::UnknownAction("x".into()), "unknown action: x"),
        (AppError::UnknownCallback("x".into()), "unknown callback: x"),
        (AppError::InvalidSubmission("x".into()), "invalid submission: x"),
        (AppError::Signature("x".into()), "signature: x"),
        (AppError::Payload("x".into()), "payload: x"),
        (AppError::Io("x".into()), "io: x"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn error_message_no_trailing_period() {
    let err = AppError::UnknownAction("question".into());
    assert!(!err.to_string().ends_with('.'));
}

#[test]
fn toml_error_converts_to_config() {
    let err: AppError = toml::from_str::<toml::Value>("= broken")
        .map_err(AppError::from)
        .unwrap_err();
    assert!(err.to_string().starts_with("config: invalid config"));
}

#[test]
fn json_error_converts_to_payload() {
    let err: AppError = serde_json::from_str::<serde_json::Value>("{")
        .map_err(AppError::from)
        .unwrap_err();
    assert!(matches!(err, AppError::Payload(_)));
}
