use ranker_core::{
    update, AppState, DocumentStatus, Effect, ExtractionFailure, Msg, Notice, SubmissionPhase,
    UploadedDocument,
};

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn pdf(name: &str) -> UploadedDocument {
    UploadedDocument::new(name, "application/pdf", format!("%PDF {name}").into_bytes())
}

fn extracted(state: AppState, upload_id: u64, text: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            upload_id,
            result: Ok(text.to_string()),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn accepted_upload_requests_extraction() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DocumentSelected(pdf("resume.pdf")));

    assert_eq!(
        effects,
        vec![Effect::ExtractText {
            upload_id: 1,
            bytes: b"%PDF resume.pdf".to_vec(),
        }]
    );
    let view = state.view();
    assert_eq!(view.document_name.as_deref(), Some("resume.pdf"));
    assert_eq!(view.document_status, DocumentStatus::Reading);

    let state = extracted(state, 1, "Jane Doe");
    assert_eq!(state.extracted_text(), "Jane Doe");
    assert_eq!(state.view().document_status, DocumentStatus::Ready { chars: 8 });
}

#[test]
fn media_type_parameters_and_case_are_ignored() {
    init_logging();
    let document = UploadedDocument::new("cv.pdf", "Application/PDF; version=1.7", vec![1]);
    let (state, effects) = update(AppState::new(), Msg::DocumentSelected(document));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.document_name(), Some("cv.pdf"));
}

#[test]
fn wrong_type_unsets_document_and_keeps_extracted_text() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("resume.pdf")));
    let state = extracted(state, 1, "old text");

    let picture = UploadedDocument::new("photo.png", "image/png", vec![0x89, 0x50]);
    let (state, effects) = update(state, Msg::DocumentSelected(picture));

    assert!(effects.is_empty());
    assert_eq!(state.document_name(), None);
    assert_eq!(state.extracted_text(), "old text");
    assert_eq!(
        state.notice(),
        Some(&Notice::WrongDocumentType {
            media_type: "image/png".into()
        })
    );
    assert_eq!(state.view().banner.as_deref(), Some("Only PDF files are allowed."));
}

#[test]
fn wrong_type_cancels_pending_extraction() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("resume.pdf")));
    let text = UploadedDocument::new("notes.txt", "text/plain", b"hi".to_vec());
    let (state, effects) = update(state, Msg::DocumentSelected(text));

    assert_eq!(effects, vec![Effect::CancelExtraction { upload_id: 1 }]);

    // The late result belongs to a document that is no longer current.
    let state = extracted(state, 1, "late");
    assert_eq!(state.extracted_text(), "");
}

#[test]
fn newer_upload_wins_when_older_resolves_last() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("first.pdf")));
    let (state, effects) = update(state, Msg::DocumentSelected(pdf("second.pdf")));

    assert_eq!(
        effects,
        vec![
            Effect::CancelExtraction { upload_id: 1 },
            Effect::ExtractText {
                upload_id: 2,
                bytes: b"%PDF second.pdf".to_vec(),
            },
        ]
    );

    let state = extracted(state, 2, "second document");
    let state = extracted(state, 1, "first document");

    assert_eq!(state.extracted_text(), "second document");
    assert_eq!(state.document_name(), Some("second.pdf"));
}

#[test]
fn newer_upload_wins_when_older_resolves_first() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("first.pdf")));
    let (state, _) = update(state, Msg::DocumentSelected(pdf("second.pdf")));

    let before = state.clone();
    let state = extracted(state, 1, "first document");
    assert_eq!(state, before);
    assert_eq!(state.extracted_text(), "");

    let state = extracted(state, 2, "second document");
    assert_eq!(state.extracted_text(), "second document");
}

#[test]
fn unreadable_document_is_dropped_without_stale_text() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("old.pdf")));
    let state = extracted(state, 1, "old text");
    let (state, _) = update(state, Msg::DocumentSelected(pdf("broken.pdf")));
    assert_eq!(state.extracted_text(), "");

    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            upload_id: 2,
            result: Err(ExtractionFailure::Unreadable {
                reason: "no pages".into(),
            }),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.document_name(), None);
    assert_eq!(state.extracted_text(), "");
    assert_eq!(state.notice(), Some(&Notice::DocumentUnreadable));
    assert_eq!(
        state.view().banner.as_deref(),
        Some("The resume could not be read. Please upload it again.")
    );

    // Retrying with a fresh upload clears the notice.
    let (state, _) = update(state, Msg::DocumentSelected(pdf("fixed.pdf")));
    assert_eq!(state.notice(), None);
}

#[test]
fn submission_waits_for_pending_extraction() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("resume.pdf")));
    let (state, _) = update(state, Msg::InputChanged("https://jobs.example.com/42".into()));
    assert!(state.view().submit_enabled);

    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.conversation().len(), 2);
    assert_eq!(
        state.phase(),
        &SubmissionPhase::Submitting {
            request_id: 1,
            upload_id: 1,
            url: "https://jobs.example.com/42".into(),
        }
    );

    // A new upload during the wait must not cancel the awaited extraction.
    let (state, effects) = update(state, Msg::DocumentSelected(pdf("next.pdf")));
    assert_eq!(
        effects,
        vec![Effect::ExtractText {
            upload_id: 2,
            bytes: b"%PDF next.pdf".to_vec(),
        }]
    );

    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            upload_id: 1,
            result: Ok("late resume".into()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RequestRanking {
            request_id: 1,
            url: "https://jobs.example.com/42".into(),
            resume: "late resume".into(),
        }]
    );
    assert_eq!(state.phase(), &SubmissionPhase::AwaitingResponse { request_id: 1 });
    assert_eq!(state.extracted_text(), "");

    let state = extracted(state, 2, "next resume");
    assert_eq!(state.extracted_text(), "next resume");
}

#[test]
fn pending_submission_fails_visibly_when_resume_unreadable() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::DocumentSelected(pdf("resume.pdf")));
    let (state, _) = update(state, Msg::InputChanged("https://jobs.example.com/42".into()));
    let (state, _) = update(state, Msg::SubmitClicked);

    let (state, effects) = update(
        state,
        Msg::ExtractionFinished {
            upload_id: 1,
            result: Err(ExtractionFailure::Unreadable {
                reason: "corrupt xref".into(),
            }),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), &SubmissionPhase::Failed { request_id: 1 });
    let messages = state.conversation().messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].is_bot());
    assert!(messages[2].text().contains("could not be read"));
    assert_eq!(state.notice(), Some(&Notice::DocumentUnreadable));
}
