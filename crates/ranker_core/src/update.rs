use crate::document::is_accepted_media_type;
use crate::gate::evaluate_gate;
use crate::ranking::{acknowledgment_text, failure_text, format_ranking_message, user_prompt_text};
use crate::{
    AppState, Effect, ExtractionFailure, Msg, Notice, RankingFailure, RankingReport, RequestId,
    SubmissionPhase, UploadId, UploadedDocument,
};

const UNREADABLE_DURING_SUBMISSION: &str =
    "Sorry, your resume could not be read, so it was not ranked. Please upload it again.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.clear_notice();
            state.set_input(text);
            Vec::new()
        }
        Msg::EnterPressed { shift: true } => Vec::new(),
        Msg::EnterPressed { shift: false } | Msg::SubmitClicked => submit(&mut state),
        Msg::DocumentSelected(document) => select_document(&mut state, document),
        Msg::ExtractionFinished { upload_id, result } => {
            finish_extraction(&mut state, upload_id, result)
        }
        Msg::RankingFinished { request_id, result } => {
            finish_ranking(&mut state, request_id, result);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if !state.phase().accepts_submission() {
        return Vec::new();
    }

    if let Some(rejection) = evaluate_gate(state.input(), state.has_document()).rejection {
        state.raise(Notice::Validation(rejection));
        return Vec::new();
    }

    // Capture the pending extraction before the optimistic reset drops the document.
    let reading = state.reading_upload();
    let (url, resume) = state.take_submission_inputs();
    let request_id = state.next_request_id();

    let conversation = state.conversation_mut();
    conversation.append_user_turn(user_prompt_text(&url));
    conversation.append_bot_turn(acknowledgment_text());

    if let Some(upload_id) = reading {
        state.set_phase(SubmissionPhase::Submitting {
            request_id,
            upload_id,
            url,
        });
        return Vec::new();
    }

    state.set_phase(SubmissionPhase::AwaitingResponse { request_id });
    vec![Effect::RequestRanking {
        request_id,
        url,
        resume,
    }]
}

fn select_document(state: &mut AppState, document: UploadedDocument) -> Vec<Effect> {
    state.clear_notice();

    let mut effects = Vec::new();
    if let Some(superseded) = state.reading_upload() {
        effects.push(Effect::CancelExtraction {
            upload_id: superseded,
        });
    }

    if !is_accepted_media_type(&document.media_type) {
        state.drop_document();
        state.raise(Notice::WrongDocumentType {
            media_type: document.media_type,
        });
        return effects;
    }

    let upload_id = state.accept_document(document.file_name);
    effects.push(Effect::ExtractText {
        upload_id,
        bytes: document.bytes,
    });
    effects
}

fn finish_extraction(
    state: &mut AppState,
    upload_id: UploadId,
    result: Result<String, ExtractionFailure>,
) -> Vec<Effect> {
    if let SubmissionPhase::Submitting {
        request_id,
        upload_id: awaited,
        url,
    } = state.phase().clone()
    {
        if awaited == upload_id {
            return resume_submission(state, request_id, url, result);
        }
    }

    if state.reading_upload() != Some(upload_id) {
        return Vec::new();
    }

    match result {
        Ok(text) => state.commit_extracted_text(text),
        Err(_) => state.discard_unreadable_document(),
    }
    Vec::new()
}

fn resume_submission(
    state: &mut AppState,
    request_id: RequestId,
    url: String,
    result: Result<String, ExtractionFailure>,
) -> Vec<Effect> {
    match result {
        Ok(resume) => {
            state.set_phase(SubmissionPhase::AwaitingResponse { request_id });
            vec![Effect::RequestRanking {
                request_id,
                url,
                resume,
            }]
        }
        Err(_) => {
            state
                .conversation_mut()
                .append_bot_turn(UNREADABLE_DURING_SUBMISSION);
            state.raise(Notice::DocumentUnreadable);
            state.set_phase(SubmissionPhase::Failed { request_id });
            Vec::new()
        }
    }
}

fn finish_ranking(
    state: &mut AppState,
    request_id: RequestId,
    result: Result<RankingReport, RankingFailure>,
) {
    if state.phase() != &(SubmissionPhase::AwaitingResponse { request_id }) {
        return;
    }

    match result {
        Ok(report) => {
            state
                .conversation_mut()
                .append_bot_turn(format_ranking_message(&report));
            state.set_phase(SubmissionPhase::Completed { request_id });
        }
        Err(failure) => {
            state.conversation_mut().append_bot_turn(failure_text(&failure));
            state.raise(Notice::RankingFailed(failure));
            state.set_phase(SubmissionPhase::Failed { request_id });
        }
    }
}
