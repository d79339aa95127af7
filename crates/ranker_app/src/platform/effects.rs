use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use engine_logging::{engine_info, engine_warn};
use ranker_core::{Effect, ExtractionFailure, Msg, RankingFailure, RankingReport};
use ranker_engine::{
    EngineEvent, EngineHandle, EventSink, PdfTextExtractor, RankingError, RankingRequest,
    ReqwestRankingClient,
};

use super::app::AppEvent;
use super::config::AppConfig;

/// Destination for the effects returned by `update`.
pub trait EffectQueue {
    fn enqueue(&mut self, effects: Vec<Effect>);
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, events: mpsc::Sender<AppEvent>) -> Result<Self> {
        let client = ReqwestRankingClient::new(config.ranking_settings())
            .context("Failed to build ranking client")?;
        let engine = EngineHandle::new(
            Arc::new(PdfTextExtractor),
            Arc::new(client),
            Arc::new(AppEventSink { tx: events }),
        )
        .context("Failed to start engine")?;
        Ok(Self { engine })
    }

    pub fn check_health(&self) {
        self.engine.health_check();
    }
}

impl EffectQueue for EffectRunner {
    fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ExtractText { upload_id, bytes } => {
                    engine_info!("ExtractText upload_id={} bytes={}", upload_id, bytes.len());
                    self.engine.extract(upload_id, bytes);
                }
                Effect::CancelExtraction { upload_id } => {
                    engine_info!("CancelExtraction upload_id={}", upload_id);
                    self.engine.cancel_extraction(upload_id);
                }
                Effect::RequestRanking {
                    request_id,
                    url,
                    resume,
                } => {
                    engine_info!(
                        "RequestRanking request_id={} url={} resume_chars={}",
                        request_id,
                        url,
                        resume.chars().count()
                    );
                    self.engine.rank(request_id, RankingRequest { url, resume });
                }
            }
        }
    }
}

struct AppEventSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for AppEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(map_event(event));
    }
}

fn map_event(event: EngineEvent) -> AppEvent {
    match event {
        EngineEvent::ExtractionCompleted { upload_id, result } => {
            AppEvent::Core(Msg::ExtractionFinished {
                upload_id,
                result: result.map_err(|err| {
                    engine_warn!("Extraction for upload {} failed: {}", upload_id, err);
                    ExtractionFailure::Unreadable {
                        reason: err.to_string(),
                    }
                }),
            })
        }
        EngineEvent::RankingCompleted { request_id, result } => {
            AppEvent::Core(Msg::RankingFinished {
                request_id,
                result: result.map(map_report).map_err(map_failure),
            })
        }
        EngineEvent::ServiceHealth(result) => {
            AppEvent::ServiceHealth(result.map_err(|err| err.to_string()))
        }
    }
}

fn map_report(report: ranker_engine::RankingReport) -> RankingReport {
    RankingReport {
        position_title: report.position_title,
        company_name: report.company_name,
        rank: report.rank,
        feedback: report.feedback,
    }
}

fn map_failure(err: RankingError) -> RankingFailure {
    if err.is_malformed_response() {
        engine_warn!("Ranking response rejected: {}", err);
        RankingFailure::MalformedResponse {
            reason: err.message,
        }
    } else {
        engine_warn!("Ranking transport failure: {}", err);
        RankingFailure::Network {
            reason: err.kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ranker_engine::{ExtractError, FailureKind};

    use super::*;

    #[test]
    fn extraction_errors_become_unreadable_documents() {
        let event = map_event(EngineEvent::ExtractionCompleted {
            upload_id: 3,
            result: Err(ExtractError::NoPages),
        });
        match event {
            AppEvent::Core(Msg::ExtractionFinished { upload_id, result }) => {
                assert_eq!(upload_id, 3);
                assert_eq!(
                    result,
                    Err(ExtractionFailure::Unreadable {
                        reason: "document has no pages".into()
                    })
                );
            }
            _ => panic!("unexpected mapping"),
        }
    }

    #[test]
    fn transport_and_contract_failures_are_told_apart() {
        let timeout = RankingError {
            kind: FailureKind::Timeout,
            message: "operation timed out".into(),
        };
        assert_eq!(
            map_failure(timeout),
            RankingFailure::Network {
                reason: "timeout".into()
            }
        );

        let malformed = RankingError {
            kind: FailureKind::MalformedResponse,
            message: "missing field `rank`".into(),
        };
        assert_eq!(
            map_failure(malformed),
            RankingFailure::MalformedResponse {
                reason: "missing field `rank`".into()
            }
        );
    }
}
