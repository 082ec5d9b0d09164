//! Recon Chatbot CLI — ask questions about an Ozone cluster in natural language.
//!
//! Modes: `--test-connections`, `--capabilities`, `--query TEXT` (single
//! shot), or an interactive console when no mode flag is given.

use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rc_agent::config::ChatbotConfig;
use rc_agent::{ChatAgent, console};

#[derive(Parser)]
#[command(name = "recon-chatbot")]
#[command(version)]
#[command(about = "Ozone Recon Chatbot - ask questions about your Ozone cluster in natural language")]
#[command(after_help = "Environment:\n  GEMINI_API_KEY    Google AI API key for Gemini\n  RECON_URL         Default Recon service URL (optional)")]
struct Cli {
    /// Base URL of the Recon service [default: http://localhost:9888]
    #[arg(long, env = "RECON_URL")]
    recon_url: Option<String>,

    /// Single query mode - ask one question and exit
    #[arg(long)]
    query: Option<String>,

    /// Test connections to Gemini and Recon and exit
    #[arg(long)]
    test_connections: bool,

    /// Show chatbot capabilities and exit
    #[arg(long)]
    capabilities: bool,

    /// TOML config file (environment variables still apply on top)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the Recon OpenAPI schema [default: the bundled api_schema/recon-api.yaml]
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Path to the Recon API guide [default: the bundled api_schema/recon-api-guide.md]
    #[arg(long)]
    guide: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Load config ─────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ChatbotConfig::from_file(path)?;
            config.apply_env();
            config
        }
        None => ChatbotConfig::from_env(),
    };
    if let Some(url) = cli.recon_url {
        config.recon.base_url = url;
    }
    if let Some(path) = cli.schema {
        config.docs.schema_path = path;
    }
    if let Some(path) = cli.guide {
        config.docs.guide_path = path;
    }
    if config.require_api_key().is_err() {
        config.gemini.api_key = Some(prompt_api_key()?);
    }

    // ── Build agent ─────────────────────────────────────────────
    println!("Initializing Ozone Recon Chatbot...");
    let agent = ChatAgent::from_config(&config).context("failed to initialize chatbot")?;

    let mut stdout = std::io::stdout();

    if cli.test_connections {
        println!("Testing connections...");
        let report = agent.test_connections().await;
        console::write_connection_details(&report, &mut stdout)?;
        return Ok(());
    }

    if cli.capabilities {
        println!("{}", agent.capabilities());
        return Ok(());
    }

    if let Some(query) = cli.query {
        println!("Query: {query}");
        let response = agent.process_query(&query).await;
        println!("Response: {response}");
        return Ok(());
    }

    let lines = console::stdin_lines().context("failed to start stdin reader")?;
    console::interactive(&agent, lines, console::interrupted(), &mut stdout).await?;
    Ok(())
}

/// Ask for the Gemini API key on a terminal; fail when there is none.
fn prompt_api_key() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        anyhow::bail!("GEMINI_API_KEY is not set");
    }

    println!("Gemini API key not found in environment variable GEMINI_API_KEY");
    print!("Please enter your Gemini API key: ");
    std::io::stdout().flush()?;

    let mut key = String::new();
    stdin.lock().read_line(&mut key)?;
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key is required to use the chatbot");
    }
    Ok(key.to_string())
}
