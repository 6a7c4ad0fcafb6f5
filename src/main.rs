//! Quotegen - knowledge-grounded price quote assistant CLI
//!
//! Main entry point for the Quotegen application.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quotegen::cli::{Cli, Commands, KnowledgeCommand};
use quotegen::commands;
use quotegen::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(|| "config/config.yaml".to_string());
    let config = Config::load(&config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { provider } => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config, provider).await
        }
        Commands::Ask { prompt } => {
            tracing::debug!("Sending one-shot question");
            commands::chat::run_ask(config, &prompt).await
        }
        Commands::Knowledge { command } => match command {
            KnowledgeCommand::Add { paths } => commands::knowledge::run_add(&config, &paths),
            KnowledgeCommand::Remove { name } => commands::knowledge::run_remove(&config, &name),
            KnowledgeCommand::List => commands::knowledge::run_list(&config),
        },
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "quotegen=debug"
    } else {
        "quotegen=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
