use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use thiserror::Error;

use crate::models::chat::{ChatResponse, GatewayChatRequest};

/// Ways a chat request can fail from the client's point of view. The
/// store treats every variant the same, a notice with no history rollback,
/// but callers that want to log or retry can still tell them apart.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Could not reach the assistant service: {0}")]
    Transport(reqwest::Error),
    #[error("Assistant service answered with status {0}")]
    Status(StatusCode),
    #[error("Assistant service answered with an unreadable body: {0}")]
    MalformedBody(reqwest::Error),
}

/// The one call the conversation store makes to the outside world.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn send_chat(&self, req: &GatewayChatRequest) -> Result<ChatResponse, GatewayError>;
}

/// Talks to a running chat gateway over HTTP.
pub struct HttpGateway {
    http: HttpClient,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Probes the gateway's health route, used by interactive surfaces to
    /// fail fast before the first message.
    pub async fn health(&self) -> Result<(), GatewayError> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl GatewayApi for HttpGateway {
    async fn send_chat(&self, req: &GatewayChatRequest) -> Result<ChatResponse, GatewayError> {
        let url = format!("{}/api/chat", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(req)
            .send()
            .await
            .map_err(GatewayError::Transport)?;

        if !resp.status().is_success() {
            return Err(GatewayError::Status(resp.status()));
        }

        resp.json::<ChatResponse>()
            .await
            .map_err(GatewayError::MalformedBody)
    }
}
