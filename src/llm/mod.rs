pub mod chat;

/// Connection settings for the upstream completion provider.
///
/// Every field is resolved once at startup from CLI flags or environment
/// variables, so the client never re-reads configuration per request.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer token sent with every completion request.
    pub api_key: String,
    /// Model identifier, e.g. `meta-llama/llama-4-maverick:free`.
    pub model: String,
    /// API root such as `https://openrouter.ai/api/v1`.
    pub base_url: String,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    /// Sampling temperature forwarded verbatim to the provider.
    pub temperature: f32,
    /// Sent as `HTTP-Referer` so the provider can attribute traffic.
    pub site_url: String,
    /// Sent as `X-Title`, the app name shown in provider dashboards.
    pub app_title: String,
}
