mod app;
mod assistant;
mod commands;
mod quotes;
mod render;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use visionary_common::{logger, AppConfig, VisionaryError};

use crate::app::AppContext;
use crate::commands::Commands;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "visionary")]
#[command(about = "Visionary - vision tracking with streamed AI suggestions", long_about = None)]
struct Cli {
    /// Data directory (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Ollama model (overrides LLM_MODEL)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    load_dotenv_from_project_root();

    let mut config = AppConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config.log_dir = data_dir.join("log");
        config.data_dir = data_dir;
    }
    if let Some(model) = cli.model {
        config.llm_model = model;
    }
    config.validate()?;
    config.ensure_directories()?;

    // Setup logging
    if let Err(e) = logger::setup_logging(&config.log_dir, &config.log_level) {
        eprintln!("File logging unavailable ({}), logging to console only", e);
        logger::setup_console_logging(&config.log_level)?;
    }

    tracing::info!("Visionary starting...");
    tracing::debug!("  Data: {}", config.data_dir.display());
    tracing::debug!("  Ollama: {} ({})", config.ollama_base_url, config.llm_model);

    let ctx = AppContext::new(config, Some(render::stdout_renderer()))?;

    if let Err(e) = commands::run(&ctx, cli.command).await {
        tracing::error!("Command failed: {}", e);
        match e {
            // Already shown in the panel output
            VisionaryError::ProviderStream(_) | VisionaryError::EmptyInput(_) => {}
            other => eprintln!("{}", other.user_message()),
        }
        std::process::exit(1);
    }

    Ok(())
}
