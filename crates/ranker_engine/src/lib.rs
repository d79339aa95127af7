//! Ranker engine: document extraction, ranking requests and effect execution.
mod engine;
mod extract;
mod rank;
mod response;
mod types;

pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use extract::{ExtractError, PdfTextExtractor, TextExtractor};
pub use rank::{RankingClient, RankingSettings, ReqwestRankingClient};
pub use response::{parse_health_response, parse_ranking_response};
pub use types::{
    EngineEvent, FailureKind, RankingError, RankingReport, RankingRequest, RequestId, UploadId,
};
