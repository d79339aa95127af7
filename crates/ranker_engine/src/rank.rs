use std::fmt;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, redact};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::response::{parse_health_response, parse_ranking_response};
use crate::{FailureKind, RankingError, RankingReport, RankingRequest};

#[derive(Clone)]
pub struct RankingSettings {
    /// Full URL the ranking request is POSTed to.
    pub endpoint: String,
    /// Static bearer credential.
    pub api_key: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl RankingSettings {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            max_bytes: 1024 * 1024,
        }
    }
}

impl fmt::Debug for RankingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &redact(&self.api_key))
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

#[async_trait::async_trait]
pub trait RankingClient: Send + Sync {
    async fn rank(&self, request: &RankingRequest) -> Result<RankingReport, RankingError>;

    /// Probes the service root and returns its greeting.
    async fn health(&self) -> Result<String, RankingError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRankingClient {
    settings: RankingSettings,
    endpoint: Url,
    client: reqwest::Client,
}

impl ReqwestRankingClient {
    pub fn new(settings: RankingSettings) -> Result<Self, RankingError> {
        let endpoint = Url::parse(&settings.endpoint)
            .map_err(|err| RankingError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RankingError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, RankingError> {
        let status = response.status();
        if !status.is_success() {
            return Err(RankingError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(too_large(max_bytes, content_len));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(too_large(max_bytes, next_len));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl RankingClient for ReqwestRankingClient {
    async fn rank(&self, request: &RankingRequest) -> Result<RankingReport, RankingError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| RankingError::new(FailureKind::InvalidRequest, err.to_string()))?;
        engine_info!(
            "POST {} url={} resume_bytes={}",
            self.endpoint,
            request.url,
            request.resume.len()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.settings.api_key)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let bytes = self.read_body(response).await?;
        engine_debug!("Ranking response {} bytes", bytes.len());
        parse_ranking_response(&bytes)
    }

    async fn health(&self) -> Result<String, RankingError> {
        let root = self
            .endpoint
            .join("/")
            .map_err(|err| RankingError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let response = self
            .client
            .get(root)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let bytes = self.read_body(response).await?;
        parse_health_response(&bytes)
    }
}

fn too_large(max_bytes: u64, actual: u64) -> RankingError {
    RankingError::new(
        FailureKind::TooLarge {
            max_bytes,
            actual: Some(actual),
        },
        "response too large",
    )
}

fn map_reqwest_error(err: reqwest::Error) -> RankingError {
    if err.is_timeout() {
        return RankingError::new(FailureKind::Timeout, err.to_string());
    }
    RankingError::new(FailureKind::Network, err.to_string())
}
