use ranker_core::{evaluate_gate, is_valid_url, update, AppState, Msg, ValidationError};

#[test]
fn url_validator_rejects_non_absolute_input() {
    assert!(!is_valid_url(""));
    assert!(!is_valid_url("   "));
    assert!(!is_valid_url("not a url"));
    assert!(!is_valid_url("/relative/path"));
    assert!(!is_valid_url("http://"));
    assert!(!is_valid_url("mailto:someone@example.com"));
}

#[test]
fn url_validator_accepts_absolute_urls() {
    assert!(is_valid_url("https://example.com/job/1"));
    assert!(is_valid_url("  https://jobs.example.com/42  "));
    assert!(is_valid_url("http://localhost:8080/postings?id=7"));
}

#[test]
fn gate_follows_decision_table() {
    let cases = [
        ("not a url", false, Some(ValidationError::ResumeAndUrlRequired), false),
        ("https://example.com/job/1", false, Some(ValidationError::ResumeRequired), false),
        ("not a url", true, Some(ValidationError::ValidUrlRequired), false),
        ("https://example.com/job/1", true, None, true),
    ];

    for (input, document_present, expected_error, expected_enabled) in cases {
        let decision = evaluate_gate(input, document_present);
        assert_eq!(decision.error, expected_error, "input={input:?} doc={document_present}");
        assert_eq!(decision.rejection, expected_error);
        assert_eq!(decision.submit_enabled, expected_enabled);
    }
}

#[test]
fn blank_form_shows_no_error_but_stays_disabled() {
    let decision = evaluate_gate("  ", false);
    assert_eq!(decision.error, None);
    assert_eq!(decision.rejection, Some(ValidationError::ResumeAndUrlRequired));
    assert!(!decision.submit_enabled);

    let decision = evaluate_gate("", true);
    assert_eq!(decision.error, Some(ValidationError::ValidUrlRequired));
    assert!(!decision.submit_enabled);
}

#[test]
fn gate_is_idempotent() {
    for (input, doc) in [("", false), ("x", true), ("https://a.example.com", false)] {
        assert_eq!(evaluate_gate(input, doc), evaluate_gate(input, doc));
    }
}

#[test]
fn initial_view_has_no_banner_and_disabled_submit() {
    let view = AppState::new().view();
    assert_eq!(view.title, "ResumeAI Ranker");
    assert_eq!(view.banner, None);
    assert_eq!(view.validation_error, None);
    assert!(!view.submit_enabled);
    assert!(view.messages.is_empty());
}

#[test]
fn banner_tracks_input_edits() {
    let (state, effects) = update(AppState::new(), Msg::InputChanged("not a url".into()));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().banner.as_deref(),
        Some("A resume and a valid job posting URL are both required.")
    );

    let (state, _) = update(state, Msg::InputChanged("https://example.com/job/1".into()));
    assert_eq!(state.view().banner.as_deref(), Some("A resume must be uploaded."));

    let (state, _) = update(state, Msg::InputChanged(String::new()));
    assert_eq!(state.view().banner, None);
}
