//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::client::RemoteClient;
use crate::core::config::GatewayConfig;
use crate::core::models::{TranslationRequest, AUTO_SOURCE, SUPPORTED_LANGUAGES};
use crate::core::orchestrator::TranslationOrchestrator;
use crate::core::usage::UsageLimiter;

/// Commands for the translation gateway
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a single piece of text
    Translate {
        /// Text to translate
        text: String,

        /// Target language (default: ja)
        #[arg(short, long, default_value = "ja")]
        target_lang: String,

        /// Source language (auto-detect if not specified)
        #[arg(short, long, default_value = AUTO_SOURCE)]
        source_lang: String,
    },

    /// Translate a text file line by line
    Batch {
        /// Input file, one text per line
        #[arg(short, long)]
        file: PathBuf,

        /// Output file (default: <input>_translated)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target language (default: ja)
        #[arg(short, long, default_value = "ja")]
        target_lang: String,

        /// Source language (auto-detect if not specified)
        #[arg(short, long, default_value = AUTO_SOURCE)]
        source_lang: String,
    },

    /// Start HTTP API server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: 8000)
        #[arg(short, long, default_value_t = 8000)]
        port: u16,

        /// Enable debug mode
        #[arg(long)]
        debug: bool,
    },

    /// List supported languages
    Languages,
}

/// Build an orchestrator from environment configuration
fn orchestrator_from_env() -> anyhow::Result<TranslationOrchestrator> {
    let config = GatewayConfig::load()?;
    let client = Arc::new(RemoteClient::new(&config)?);
    let limiter = UsageLimiter::new(config.daily_limit, config.monthly_limit);
    Ok(TranslationOrchestrator::new(client, limiter))
}

/// Read input lines for batch translation
fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// Handle single translation command
pub async fn handle_translate(
    text: String,
    target_lang: String,
    source_lang: String,
) -> anyhow::Result<()> {
    use tracing::info;

    let orchestrator = orchestrator_from_env()?;

    let request = TranslationRequest::new(text, target_lang).with_source_lang(source_lang);
    info!("Translating to {}", request.target_lang);

    let outcome = orchestrator.handle_translation(&request).await?;

    if let Some(detected) = &outcome.detected_lang {
        println!("🔍 Detected language: {}", detected);
    }
    println!("{}", outcome.translated_text);

    let usage = orchestrator.usage().await;
    println!(
        "📊 Usage: {}/{} today, {}/{} this month",
        usage.daily_count, usage.daily_limit, usage.monthly_count, usage.monthly_limit
    );

    Ok(())
}

/// Handle batch translation command
pub async fn handle_batch(
    file: PathBuf,
    output: Option<PathBuf>,
    target_lang: String,
    source_lang: String,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Instant;
    use tracing::info;

    let start_time = Instant::now();

    let output = output.unwrap_or_else(|| {
        let mut out = file.clone();
        let mut filename = file.file_name().unwrap_or_default().to_os_string();
        filename.push("_translated");
        out.set_file_name(filename);
        out
    });

    info!("Starting batch translation");
    info!("Input: {}", file.display());
    info!("Output: {}", output.display());
    info!("Target language: {}", target_lang);

    let orchestrator = orchestrator_from_env()?;

    let lines = read_lines(&file)?;
    if lines.is_empty() {
        anyhow::bail!("Input file is empty");
    }

    let pb = ProgressBar::new(lines.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap()
        .progress_chars("=>-"));

    let items = orchestrator
        .translate_batch(&lines, &target_lang, &source_lang, |_fraction| {
            pb.inc(1);
        })
        .await;

    pb.finish_with_message("Completed");

    let mut translated = 0;
    let mut failed = 0;
    let mut out_lines = Vec::new();

    for item in &items {
        match &item.result {
            Ok(outcome) => {
                translated += 1;
                out_lines.push(format!("{} → {}", item.original, outcome.translated_text));
            }
            Err(e) => {
                failed += 1;
                eprintln!("Line {}: {}", item.line_no, e);
                out_lines.push(format!("{} → [failed: {}]", item.original, e));
            }
        }
    }

    std::fs::write(&output, out_lines.join("\n"))?;

    let duration = start_time.elapsed();
    info!(
        "Completed: {} translated, {} failed in {:?}",
        translated, failed, duration
    );

    println!("\n✅ Batch translation completed!");
    println!("   Translated: {}", translated);
    println!("   Failed: {}", failed);
    println!("   Output: {}", output.display());
    println!("   Time: {:?}", duration);

    Ok(())
}

/// Handle server command
pub async fn handle_server(host: String, port: u16, debug: bool) -> anyhow::Result<()> {
    use crate::server::api::run_server;
    use tracing::info;

    if debug {
        std::env::set_var("RUST_LOG", "debug");
    }

    info!("Starting HTTP server on {}:{}", host, port);
    println!("🚀 Server starting on http://{}:{}", host, port);

    run_server(host, port).await?;

    Ok(())
}

/// Handle languages command
pub fn handle_languages() {
    println!("Supported languages ({}):", SUPPORTED_LANGUAGES.len());
    for (code, name) in SUPPORTED_LANGUAGES {
        println!("  {:5} {}", code, name);
    }
}
