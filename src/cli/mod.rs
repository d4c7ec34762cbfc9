use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Provider Args ---
    /// Base URL for the completion provider API (e.g., https://openrouter.ai/api/v1)
    #[arg(long, env = "PROVIDER_BASE_URL", default_value = "https://openrouter.ai/api/v1")]
    pub provider_base_url: String,

    /// API key for the completion provider
    #[arg(long, env = "OPENROUTER_API_KEY", default_value = "")]
    pub provider_api_key: String,

    /// Model name for chat completion (e.g., meta-llama/llama-4-maverick:free)
    #[arg(long, env = "PROVIDER_MODEL", default_value = "meta-llama/llama-4-maverick:free")]
    pub provider_model: String,

    /// Maximum number of tokens the provider may generate per reply.
    #[arg(long, env = "PROVIDER_MAX_TOKENS", default_value = "500")]
    pub provider_max_tokens: u32,

    /// Sampling temperature for chat completion (0.0 to 2.0).
    #[arg(long, env = "PROVIDER_TEMPERATURE", default_value = "0.7")]
    pub provider_temperature: f32,

    /// Site URL reported to the provider in the HTTP-Referer header for traffic attribution.
    #[arg(long, env = "SITE_URL", default_value = "http://localhost:3000")]
    pub site_url: String,

    /// App name reported to the provider in the X-Title header.
    #[arg(long, env = "APP_TITLE", default_value = "Airbnb AI Assistant")]
    pub app_title: String,

    // --- General App Args ---
    /// Optional path to the prompt configuration file. Built-in prompts are used when not set.
    #[arg(long, env = "PROMPTS_PATH")]
    pub prompts_path: Option<String>,

    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Optional path to the TLS certificate file (PEM format) for enabling HTTPS. Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format) for enabling HTTPS. Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
