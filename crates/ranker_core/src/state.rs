use std::fmt;

use crate::gate::{evaluate_gate, ValidationError};
use crate::view_model::{AppViewModel, DocumentStatus, MessageView, APP_TITLE};
use crate::{Conversation, RankingFailure};

/// Freshness token assigned to each accepted upload.
pub type UploadId = u64;
/// Freshness token assigned to each submission.
pub type RequestId = u64;

/// Orchestrator state for the single submission in flight.
///
/// Validation happens inside the reducer when a submit is attempted, so it
/// never shows up as a resting phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    /// Inputs are cleared; waiting for the résumé text before the request goes out.
    Submitting {
        request_id: RequestId,
        upload_id: UploadId,
        url: String,
    },
    AwaitingResponse { request_id: RequestId },
    Completed { request_id: RequestId },
    Failed { request_id: RequestId },
}

impl SubmissionPhase {
    pub fn accepts_submission(&self) -> bool {
        matches!(
            self,
            SubmissionPhase::Idle | SubmissionPhase::Completed { .. } | SubmissionPhase::Failed { .. }
        )
    }
}

/// Errors that reach the banner outside of the live gate computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A submit was attempted while the gate was closed.
    Validation(ValidationError),
    WrongDocumentType { media_type: String },
    DocumentUnreadable,
    RankingFailed(RankingFailure),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Validation(err) => write!(f, "{err}"),
            Notice::WrongDocumentType { .. } => write!(f, "Only PDF files are allowed."),
            Notice::DocumentUnreadable => {
                write!(f, "The resume could not be read. Please upload it again.")
            }
            Notice::RankingFailed(RankingFailure::Network { .. }) => {
                write!(f, "The ranking service could not be reached. Please try again.")
            }
            Notice::RankingFailed(RankingFailure::MalformedResponse { .. }) => {
                write!(f, "The ranking service returned an unexpected response.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentDocument {
    upload_id: UploadId,
    file_name: String,
    reading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    input: String,
    document: Option<CurrentDocument>,
    extracted_text: String,
    conversation: Conversation,
    phase: SubmissionPhase,
    notice: Option<Notice>,
    last_upload_id: UploadId,
    last_request_id: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted_text
    }

    pub fn document_name(&self) -> Option<&str> {
        self.document.as_ref().map(|doc| doc.file_name.as_str())
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let gate = evaluate_gate(&self.input, self.document.is_some());
        let banner = self
            .notice
            .as_ref()
            .map(ToString::to_string)
            .or_else(|| gate.error.map(|err| err.to_string()));
        let document_status = match &self.document {
            None => DocumentStatus::Missing,
            Some(doc) if doc.reading => DocumentStatus::Reading,
            Some(_) => DocumentStatus::Ready {
                chars: self.extracted_text.chars().count(),
            },
        };

        AppViewModel {
            title: APP_TITLE,
            messages: self
                .conversation
                .messages()
                .iter()
                .map(|message| MessageView {
                    text: message.text().to_string(),
                    is_bot: message.is_bot(),
                })
                .collect(),
            input: self.input.clone(),
            document_name: self.document_name().map(ToOwned::to_owned),
            document_status,
            validation_error: gate.error,
            banner,
            submit_enabled: gate.submit_enabled && self.phase.accepts_submission(),
            phase: self.phase.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn raise(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn has_document(&self) -> bool {
        self.document.is_some()
    }

    /// Upload id of the current document while its text is still being read.
    pub(crate) fn reading_upload(&self) -> Option<UploadId> {
        self.document
            .as_ref()
            .filter(|doc| doc.reading)
            .map(|doc| doc.upload_id)
    }

    /// Installs a freshly accepted document and returns its freshness token.
    pub(crate) fn accept_document(&mut self, file_name: String) -> UploadId {
        self.last_upload_id += 1;
        let upload_id = self.last_upload_id;
        self.document = Some(CurrentDocument {
            upload_id,
            file_name,
            reading: true,
        });
        self.extracted_text.clear();
        self.mark_dirty();
        upload_id
    }

    /// Drops the current document; extracted text is left as it was.
    pub(crate) fn drop_document(&mut self) {
        if self.document.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn commit_extracted_text(&mut self, text: String) {
        if let Some(doc) = self.document.as_mut() {
            doc.reading = false;
        }
        self.extracted_text = text;
        self.mark_dirty();
    }

    pub(crate) fn discard_unreadable_document(&mut self) {
        self.document = None;
        self.extracted_text.clear();
        self.raise(Notice::DocumentUnreadable);
    }

    /// Optimistic reset at submission time. Returns the taken URL and text.
    pub(crate) fn take_submission_inputs(&mut self) -> (String, String) {
        let url = std::mem::take(&mut self.input).trim().to_string();
        let resume = std::mem::take(&mut self.extracted_text);
        self.document = None;
        self.notice = None;
        self.mark_dirty();
        (url, resume)
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    pub(crate) fn set_phase(&mut self, phase: SubmissionPhase) {
        self.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn conversation_mut(&mut self) -> &mut Conversation {
        self.mark_dirty();
        &mut self.conversation
    }
}
