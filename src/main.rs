//! Main entry point for the Lingua Gateway CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod server;

use cli::commands::Commands;

/// Lingua Gateway - translation with daily/monthly usage quotas
#[derive(Parser, Debug)]
#[command(name = "lingua-gateway", version, about, long_about = None)]
struct Args {
    /// API key for the language service (defaults to LANGUAGE_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_key) = &args.api_key {
        std::env::set_var("LANGUAGE_API_KEY", api_key);
    }

    let log_level = if args.verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("lingua_gateway={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Some(Commands::Translate {
            text,
            target_lang,
            source_lang,
        }) => {
            cli::commands::handle_translate(text, target_lang, source_lang).await?;
        }
        Some(Commands::Batch {
            file,
            output,
            target_lang,
            source_lang,
        }) => {
            cli::commands::handle_batch(file, output, target_lang, source_lang).await?;
        }
        Some(Commands::Server { host, port, debug }) => {
            cli::commands::handle_server(host, port, debug).await?;
        }
        Some(Commands::Languages) => {
            cli::commands::handle_languages();
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
