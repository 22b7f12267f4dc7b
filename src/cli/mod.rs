//! Income inference CLI module
//!
//! Command-line interface for serving, one-off preprocessing and prediction,
//! and inspecting the encoding tables.

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::inference::{InferenceConfig, InferenceEngine};
use crate::preprocessing::{DataPreprocessor, EncodingTables, Feature, RawRecord, FEATURE_ORDER};
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "income-inference")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Income prediction service with mode imputation and label encoding")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the prediction API server
    Serve {
        /// Host to bind to (default: API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: API_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the feature vector for one record
    Preprocess {
        /// JSON record keyed by feature name (e.g. "hours-per-week")
        #[arg(short, long)]
        input: PathBuf,

        /// Directory with label_mappings.json, standard_scaler.json, mode_values.json
        #[arg(long)]
        model_docs: Option<PathBuf>,
    },

    /// Predict the income class of one record
    Predict {
        /// JSON record keyed by feature name
        #[arg(short, long)]
        input: PathBuf,

        /// Model artifact
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Encoding tables directory
        #[arg(long)]
        model_docs: Option<PathBuf>,
    },

    /// Summarize the encoding tables
    Info {
        /// Encoding tables directory
        #[arg(long)]
        model_docs: Option<PathBuf>,
    },
}

fn inference_config(model: Option<&Path>, model_docs: Option<&Path>) -> anyhow::Result<InferenceConfig> {
    let mut config = InferenceConfig::from_env()?;
    if let Some(path) = model {
        config = config.with_model_path(path);
    }
    if let Some(dir) = model_docs {
        config = config.with_model_docs_dir(dir);
    }
    Ok(config)
}

fn read_record(path: &Path) -> anyhow::Result<RawRecord> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("invalid record in {}", path.display()))
}

/// Start the server
pub async fn cmd_serve(host: Option<&str>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(host) = host {
        config.host = host.to_string();
    }
    if let Some(port) = port {
        config.port = port;
    }
    run_server(config).await
}

/// Preprocess one record and print the vector
pub fn cmd_preprocess(input: &Path, model_docs: Option<&Path>) -> anyhow::Result<()> {
    let config = inference_config(None, model_docs)?;
    let tables = Arc::new(EncodingTables::load_dir(&config.model_docs_dir)?);
    let preprocessor = DataPreprocessor::with_config(tables, config.preprocessing)?;
    let record = read_record(input)?;

    let processed = preprocessor.preprocess(&record)?;
    section("Feature vector");
    for (name, value) in FEATURE_ORDER.iter().zip(&processed.features) {
        println!("  {}", kv(&format!("{:<20}", name), &format!("{:.6}", value)));
    }
    section("Imputed features");
    if processed.imputed_features.is_empty() {
        println!("  {}", dim("none"));
    } else {
        for name in &processed.imputed_features {
            println!("  {}", name);
        }
    }
    println!();
    Ok(())
}

/// Predict one record and print the result
pub fn cmd_predict(input: &Path, model: Option<&Path>, model_docs: Option<&Path>) -> anyhow::Result<()> {
    let engine = InferenceEngine::load(&inference_config(model, model_docs)?)?;
    let record = read_record(input)?;

    let prediction = engine.predict(&record)?;
    let class = if prediction.prediction == 1 { ">50K" } else { "<=50K" };
    section("Prediction");
    println!("  {}", kv("class      ", &format!("{} ({})", prediction.prediction, class)));
    println!("  {}", kv("probability", &format!("{:.4}", prediction.probability)));
    println!(
        "  {}",
        kv("imputed    ", &format!("{:?}", prediction.imputed_features))
    );
    println!();
    Ok(())
}

/// Print a summary of the encoding tables
pub fn cmd_info(model_docs: Option<&Path>) -> anyhow::Result<()> {
    let config = inference_config(None, model_docs)?;
    let tables = EncodingTables::load_dir(&config.model_docs_dir)?;
    step_ok(&format!("Loaded tables from {}", config.model_docs_dir.display()));

    section("Label tables");
    for name in tables.label_features() {
        let size = tables.label_table(name).map_or(0, |t| t.len());
        println!("  {}", kv(&format!("{:<20}", name), &format!("{} labels", size)));
    }

    section("Standardization");
    for feature in Feature::STANDARDIZED {
        let stats = tables.lookup_mean_var(feature.name())?;
        println!(
            "  {}",
            kv(
                &format!("{:<20}", feature.name()),
                &format!("mean {:.3}  std {:.3}", stats.mean, stats.variance.sqrt())
            )
        );
    }

    section("Imputation modes");
    for feature in Feature::ALL {
        println!(
            "  {}",
            kv(&format!("{:<20}", feature.name()), &tables.lookup_mode(feature.name())?.to_string())
        );
    }
    println!();
    Ok(())
}
