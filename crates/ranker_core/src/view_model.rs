use crate::{SubmissionPhase, ValidationError};

pub const APP_TITLE: &str = "ResumeAI Ranker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    #[default]
    Missing,
    Reading,
    Ready { chars: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub title: &'static str,
    pub messages: Vec<MessageView>,
    pub input: String,
    pub document_name: Option<String>,
    pub document_status: DocumentStatus,
    /// Live gate result for the current inputs.
    pub validation_error: Option<ValidationError>,
    /// Text for the single error banner, if any.
    pub banner: Option<String>,
    pub submit_enabled: bool,
    pub phase: SubmissionPhase,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub text: String,
    pub is_bot: bool,
}
