use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use dotenv::dotenv;
use log::error;

use stay_concierge::config::prompt::resolve_prompts;
use stay_concierge::models::chat::Role;
use stay_concierge::store::attachment::PendingAttachment;
use stay_concierge::store::gateway::HttpGateway;
use stay_concierge::store::notify::{Notifier, Severity};
use stay_concierge::store::ConversationStore;

/// Terminal chat client for the stay concierge gateway.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct ClientArgs {
    /// Base URL of the running chat gateway.
    #[arg(long, env = "GATEWAY_URL", default_value = "http://127.0.0.1:4000")]
    gateway_url: String,

    /// Optional path to the prompt configuration file. Built-in prompts are used when not set.
    #[arg(long, env = "PROMPTS_PATH")]
    prompts_path: Option<String>,
}

/// Prints store notices straight to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, description: &str, severity: Severity) {
        match severity {
            Severity::Info => println!("[{}] {}", title, description),
            Severity::Error => eprintln!("[{}] {}", title, description),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = ClientArgs::parse();

    let gateway = HttpGateway::new(&args.gateway_url);
    if let Err(e) = gateway.health().await {
        error!("Gateway health check failed: {}", e);
        eprintln!(
            "Could not reach the assistant gateway at {}: {}",
            args.gateway_url, e
        );
        return Err(Box::new(e) as Box<dyn Error + Send + Sync>);
    }

    let prompts = resolve_prompts(args.prompts_path.as_deref())?;
    let mut store = ConversationStore::new(Arc::new(gateway), Arc::new(ConsoleNotifier), prompts);

    if let Some(greeting) = store.messages().first() {
        println!("Assistant: {}", greeting.content);
    }
    println!();
    println!("Try asking about:");
    for (i, prompt) in store.suggested_prompts().iter().enumerate() {
        println!("  {}. {}", i + 1, prompt);
    }
    println!();
    println!("Commands: /image <path> to stage a picture, /remove to unstage it,");
    println!("a number to send a suggested prompt, exit or quit to leave.");
    println!();

    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let line = line.trim();

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line.is_empty() {
            // An empty line still sends when an image is staged.
            if store.pending_attachment().is_some() {
                store.send("").await;
                print_reply(&store);
            }
            continue;
        }

        if let Some(path) = line.strip_prefix("/image ") {
            let path = path.trim();
            match PendingAttachment::from_file(Path::new(path)) {
                Ok(att) => store.select_attachment(att),
                Err(e) => eprintln!("Could not attach {}: {}", path, e),
            }
            continue;
        }

        if line == "/remove" {
            store.remove_attachment();
            println!("Attachment removed.");
            continue;
        }

        if let Ok(n) = line.parse::<usize>() {
            let suggested = n
                .checked_sub(1)
                .and_then(|i| store.suggested_prompts().get(i))
                .cloned();
            if let Some(prompt) = suggested {
                println!("You: {}", prompt);
                store.send(&prompt).await;
                print_reply(&store);
                continue;
            }
        }

        store.set_input(line);
        store.submit().await;
        print_reply(&store);
    }

    Ok(())
}

fn print_reply(store: &ConversationStore) {
    if let Some(last) = store.messages().last() {
        if last.role == Role::Assistant {
            println!("Assistant: {}", last.content);
        }
    }
}
