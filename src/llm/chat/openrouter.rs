use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client as HttpClient,
};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::{ChatProvider, ProviderError, ProviderTurn};
use crate::llm::ProviderConfig;

/// Client for the OpenRouter chat completions API.
///
/// Holds one pooled HTTP client with the auth and attribution headers
/// installed as defaults, so each request only carries the payload.
pub struct OpenRouterClient {
    http: HttpClient,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ProviderTurn],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

/// First non-empty completion text, if the provider returned one.
fn reply_text(resp: ChatCompletionResponse) -> Option<String> {
    resp.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.is_empty())
}

impl OpenRouterClient {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| format!("Invalid API key format: {}", e))?,
        );
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(&config.site_url)
                .map_err(|e| format!("Invalid site URL for HTTP-Referer: {}", e))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(&config.app_title)
                .map_err(|e| format!("Invalid app title for X-Title: {}", e))?,
        );

        let http = HttpClient::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenRouterClient {
    async fn complete(&self, turns: &[ProviderTurn]) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let req = ChatCompletionRequest {
            model: &self.model,
            messages: turns,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatCompletionResponse>()
            .await?;

        reply_text(resp).ok_or(ProviderError::EmptyCompletion)
    }
}
