//! Income Inference - Main Entry Point
//!
//! Runs the prediction server by default, or a one-off CLI command.

use clap::Parser;
use income_inference::cli::{Cli, Commands, cmd_serve, cmd_preprocess, cmd_predict, cmd_info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "income_inference=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            cmd_serve(host.as_deref(), port).await?;
        }
        Some(Commands::Preprocess { input, model_docs }) => {
            cmd_preprocess(&input, model_docs.as_deref())?;
        }
        Some(Commands::Predict { input, model, model_docs }) => {
            cmd_predict(&input, model.as_deref(), model_docs.as_deref())?;
        }
        Some(Commands::Info { model_docs }) => {
            cmd_info(model_docs.as_deref())?;
        }
        None => {
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
