use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, PRAGMA};
use status_logging::status_debug;
use url::Url;

use crate::{EngineEvent, FailureKind, FetchError, PollResponse};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Bound on establishing the connection. The request itself is never timed out.
    pub connect_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events to the host loop, tagged with the page generation they belong to.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<(u64, EngineEvent)>,
    generation: u64,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<(u64, EngineEvent)>, generation: u64) -> Self {
        Self { tx, generation }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send((self.generation, event));
    }
}

#[async_trait::async_trait]
pub trait StatusFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<PollResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestStatusFetcher {
    settings: FetchSettings,
}

impl ReqwestStatusFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl StatusFetcher for ReqwestStatusFetcher {
    async fn fetch(&self, url: &Url) -> Result<PollResponse, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {}", url.scheme()),
            ));
        }
        let client = self.build_client()?;

        let response = client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| FetchError::new(FailureKind::Body, err.to_string()))?;
        status_debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(PollResponse { status, body })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_connect() {
        return FetchError::new(FailureKind::Connect, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
