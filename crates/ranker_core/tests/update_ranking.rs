use ranker_core::{
    format_rank_percent, format_ranking_message, update, AppState, Effect, Msg, Notice,
    RankingFailure, RankingReport, SubmissionPhase, UploadedDocument,
};

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn submitted(url: &str) -> AppState {
    let document = UploadedDocument::new("resume.pdf", "application/pdf", vec![1, 2, 3]);
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(document));
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            upload_id: 1,
            result: Ok("resume".into()),
        },
    );
    let (state, _) = update(state, Msg::InputChanged(url.to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    state
}

fn report(rank: f64) -> RankingReport {
    RankingReport {
        position_title: "Engineer".into(),
        company_name: "Acme".into(),
        rank,
        feedback: "Strong match".into(),
    }
}

#[test]
fn rank_renders_as_two_decimal_percent() {
    assert_eq!(format_rank_percent(0.8734), "87.34%");
    assert_eq!(format_rank_percent(0.5), "50.00%");
    assert_eq!(format_rank_percent(1.0), "100.00%");
    assert_eq!(format_rank_percent(0.0), "0.00%");
}

#[test]
fn ranking_message_has_identification_rank_and_feedback() {
    let text = format_ranking_message(&report(0.8734));
    assert_eq!(text, "Engineer at Acme\nMatch: 87.34%\nStrong match");
}

#[test]
fn successful_response_appends_result_turn() {
    init_logging();
    let state = submitted("https://jobs.example.com/42");

    let (state, effects) = update(
        state,
        Msg::RankingFinished {
            request_id: 1,
            result: Ok(report(0.8734)),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.messages.len(), 3);
    let last = &view.messages[2];
    assert!(last.is_bot);
    assert!(last.text.contains("87.34%"));
    assert!(last.text.contains("Engineer"));
    assert!(last.text.contains("Acme"));
    assert!(last.text.contains("Strong match"));
    assert_eq!(view.phase, SubmissionPhase::Completed { request_id: 1 });
    assert_eq!(view.banner, None);
}

#[test]
fn network_failure_appends_visible_error_turn() {
    init_logging();
    let state = submitted("https://jobs.example.com/42");

    let failure = RankingFailure::Network {
        reason: "timeout".into(),
    };
    let (state, _) = update(
        state,
        Msg::RankingFinished {
            request_id: 1,
            result: Err(failure.clone()),
        },
    );

    let messages = state.conversation().messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].is_bot());
    assert_eq!(
        messages[2].text(),
        "Sorry, the ranking service could not be reached (timeout). Please try again."
    );
    assert_eq!(state.notice(), Some(&Notice::RankingFailed(failure)));
    assert_eq!(
        state.view().banner.as_deref(),
        Some("The ranking service could not be reached. Please try again.")
    );
    assert_eq!(state.phase(), &SubmissionPhase::Failed { request_id: 1 });
}

#[test]
fn malformed_response_is_reported() {
    init_logging();
    let state = submitted("https://jobs.example.com/42");
    let (state, _) = update(
        state,
        Msg::RankingFinished {
            request_id: 1,
            result: Err(RankingFailure::MalformedResponse {
                reason: "missing field `rank`".into(),
            }),
        },
    );

    let last = state.conversation().messages().last().cloned().unwrap();
    assert!(last.text().contains("unexpected response"));
    assert!(last.text().contains("rank"));
}

#[test]
fn stale_ranking_result_is_discarded() {
    init_logging();
    let state = submitted("https://jobs.example.com/42");
    let before = state.clone();

    let (state, effects) = update(
        state,
        Msg::RankingFinished {
            request_id: 99,
            result: Ok(report(0.1)),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn new_submission_allowed_after_failure() {
    init_logging();
    let state = submitted("https://jobs.example.com/42");
    let (state, _) = update(
        state,
        Msg::RankingFinished {
            request_id: 1,
            result: Err(RankingFailure::Network {
                reason: "connection refused".into(),
            }),
        },
    );

    let document = UploadedDocument::new("resume.pdf", "application/pdf", vec![4]);
    let (state, _) = update(state, Msg::DocumentSelected(document));
    let (state, _) = update(
        state,
        Msg::ExtractionFinished {
            upload_id: 2,
            result: Ok("resume again".into()),
        },
    );
    let (state, _) = update(state, Msg::InputChanged("https://jobs.example.com/43".into()));
    assert_eq!(state.view().banner, None);
    assert!(state.view().submit_enabled);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(
        effects,
        vec![Effect::RequestRanking {
            request_id: 2,
            url: "https://jobs.example.com/43".into(),
            resume: "resume again".into(),
        }]
    );
    assert_eq!(state.conversation().len(), 5);
    // Late duplicate of the first request changes nothing.
    let before = state.clone();
    let (state, _) = update(
        state,
        Msg::RankingFinished {
            request_id: 1,
            result: Ok(report(0.9)),
        },
    );
    assert_eq!(state, before);
}
