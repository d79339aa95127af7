//! Ranker core: pure state machine, submission gate and view-model helpers.
mod conversation;
mod document;
mod effect;
mod gate;
mod msg;
mod ranking;
mod state;
mod update;
mod url_check;
mod view_model;

pub use conversation::{Conversation, Message};
pub use document::{is_accepted_media_type, UploadedDocument, ACCEPTED_MEDIA_TYPE};
pub use effect::Effect;
pub use gate::{evaluate_gate, GateDecision, ValidationError};
pub use msg::Msg;
pub use ranking::{
    acknowledgment_text, failure_text, format_ranking_message, format_rank_percent,
    user_prompt_text, ExtractionFailure, RankingFailure, RankingReport,
};
pub use state::{AppState, Notice, RequestId, SubmissionPhase, UploadId};
pub use update::update;
pub use url_check::is_valid_url;
pub use view_model::{AppViewModel, DocumentStatus, MessageView, APP_TITLE};
