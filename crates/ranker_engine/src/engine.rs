use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::{
    EngineEvent, ExtractError, RankingClient, RankingRequest, RequestId, TextExtractor, UploadId,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build async runtime: {0}")]
    Runtime(io::Error),
    #[error("failed to spawn engine thread: {0}")]
    Thread(io::Error),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Extract { upload_id: UploadId, bytes: Vec<u8> },
    CancelExtraction { upload_id: UploadId },
    Rank {
        request_id: RequestId,
        request: RankingRequest,
    },
    Health,
}

/// Handle to the engine thread. Dropping it shuts the engine down.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        client: Arc<dyn RankingClient>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ranker-engine-worker")
            .build()
            .map_err(EngineError::Runtime)?;

        thread::Builder::new()
            .name("ranker-engine".to_string())
            .spawn(move || {
                let mut extractions: HashMap<UploadId, CancellationToken> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    extractions.retain(|_, token| !token.is_cancelled());
                    match command {
                        EngineCommand::Extract { upload_id, bytes } => {
                            let token = CancellationToken::new();
                            extractions.insert(upload_id, token.clone());
                            runtime.spawn(run_extraction(
                                extractor.clone(),
                                sink.clone(),
                                upload_id,
                                bytes,
                                token,
                            ));
                        }
                        EngineCommand::CancelExtraction { upload_id } => {
                            if let Some(token) = extractions.remove(&upload_id) {
                                engine_debug!("Cancelling extraction for upload {}", upload_id);
                                token.cancel();
                            }
                        }
                        EngineCommand::Rank {
                            request_id,
                            request,
                        } => {
                            let client = client.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                let result = client.rank(&request).await;
                                sink.emit(EngineEvent::RankingCompleted { request_id, result });
                            });
                        }
                        EngineCommand::Health => {
                            let client = client.clone();
                            let sink = sink.clone();
                            runtime.spawn(async move {
                                sink.emit(EngineEvent::ServiceHealth(client.health().await));
                            });
                        }
                    }
                }
                engine_info!("Engine command channel closed; shutting down");
                runtime.shutdown_timeout(Duration::from_secs(1));
            })
            .map_err(EngineError::Thread)?;

        Ok(Self { cmd_tx })
    }

    pub fn extract(&self, upload_id: UploadId, bytes: Vec<u8>) {
        self.send(EngineCommand::Extract { upload_id, bytes });
    }

    /// Best effort: a blocking parse already underway finishes, but its result is dropped.
    pub fn cancel_extraction(&self, upload_id: UploadId) {
        self.send(EngineCommand::CancelExtraction { upload_id });
    }

    pub fn rank(&self, request_id: RequestId, request: RankingRequest) {
        self.send(EngineCommand::Rank {
            request_id,
            request,
        });
    }

    pub fn health_check(&self) {
        self.send(EngineCommand::Health);
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            engine_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn run_extraction(
    extractor: Arc<dyn TextExtractor>,
    sink: Arc<dyn EventSink>,
    upload_id: UploadId,
    bytes: Vec<u8>,
    token: CancellationToken,
) {
    let job = tokio::task::spawn_blocking(move || extractor.extract(&bytes));
    let result = tokio::select! {
        _ = token.cancelled() => {
            engine_debug!("Extraction for upload {} cancelled", upload_id);
            return;
        }
        joined = job => match joined {
            Ok(result) => result,
            Err(err) => Err(ExtractError::Aborted(err.to_string())),
        },
    };
    // Marks the entry as finished so the command loop can prune it.
    token.cancel();
    sink.emit(EngineEvent::ExtractionCompleted { upload_id, result });
}
