pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;

use std::error::Error;
use std::sync::Arc;

use log::info;

use cli::Args;
use config::prompt::resolve_prompts;
use llm::chat::openrouter::OpenRouterClient;
use llm::chat::ChatProvider;
use llm::ProviderConfig;
use server::api::AppState;
use server::Server;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Provider Base URL: {}", args.provider_base_url);
    info!("Provider Model: {}", args.provider_model);
    info!("Max Tokens: {}", args.provider_max_tokens);
    info!("Temperature: {}", args.provider_temperature);
    info!(
        "Prompts Path: {}",
        args.prompts_path.as_deref().unwrap_or("(built-in defaults)")
    );
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let prompts = resolve_prompts(args.prompts_path.as_deref())?;

    let provider_config = ProviderConfig {
        api_key: args.provider_api_key.clone(),
        model: args.provider_model.clone(),
        base_url: args.provider_base_url.clone(),
        max_tokens: args.provider_max_tokens,
        temperature: args.provider_temperature,
        site_url: args.site_url.clone(),
        app_title: args.app_title.clone(),
    };
    let provider: Arc<dyn ChatProvider> = Arc::new(OpenRouterClient::from_config(&provider_config)?);

    let state = AppState { provider, prompts };
    let addr = args.server_addr.clone();
    let server = Server::new(addr, state, args);
    server.run().await?;

    Ok(())
}
