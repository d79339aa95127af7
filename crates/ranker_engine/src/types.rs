use std::fmt;

use serde::Serialize;

use crate::ExtractError;

pub type UploadId = u64;
pub type RequestId = u64;

/// Body of the outbound ranking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingRequest {
    pub url: String,
    pub resume: String,
}

/// Validated ranking service answer.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport {
    pub position_title: String,
    pub company_name: String,
    pub rank: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ExtractionCompleted {
        upload_id: UploadId,
        result: Result<String, ExtractError>,
    },
    RankingCompleted {
        request_id: RequestId,
        result: Result<RankingReport, RankingError>,
    },
    ServiceHealth(Result<String, RankingError>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RankingError {
    pub kind: FailureKind,
    pub message: String,
}

impl RankingError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// True for failures where the service answered but broke the contract.
    pub fn is_malformed_response(&self) -> bool {
        matches!(self.kind, FailureKind::MalformedResponse)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid endpoint url"),
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
