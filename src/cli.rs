//! Command-line interface for the meal voucher engine.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::api::{AppState, create_router};
use crate::calculation::run_benefit;
use crate::config::{BenefitConfig, ConfigLoader};
use crate::error::EngineResult;
use crate::io::{default_output_path, load_sources, write_output};
use crate::models::{Competence, RunResult};

/// Meal voucher engine - monthly VR/VA benefit computation.
#[derive(Debug, Parser)]
#[command(name = "meal-voucher")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute the benefit table for one competence month.
    Run {
        /// Competence month, YYYY-MM (e.g. 2025-05)
        #[arg(short, long)]
        competence: String,

        /// Directory holding the ten source CSV files
        #[arg(short, long)]
        data: PathBuf,

        /// Configuration directory (default: built-in policy)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file (default: <data>/VR_FINAL_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Serve the HTTP API.
    Serve {
        /// Configuration directory (default: built-in policy)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

/// Run the CLI.
pub async fn run() -> EngineResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            competence,
            data,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let (result, path) = run_command(&competence, &data, &config, output)?;
            print_summary(&result, &path);
            Ok(())
        }
        Commands::Serve { config, addr } => {
            let config = load_config(config.as_deref())?;
            serve_command(config, addr).await
        }
    }
}

/// The configuration in `dir`, or the built-in defaults.
pub fn load_config(dir: Option<&Path>) -> EngineResult<BenefitConfig> {
    match dir {
        Some(dir) => Ok(ConfigLoader::load(dir)?.into_config()),
        None => Ok(BenefitConfig::default()),
    }
}

/// Loads the sources in `data`, runs the competence month and writes the
/// output table. Returns the result and the path written.
pub fn run_command(
    competence: &str,
    data: &Path,
    config: &BenefitConfig,
    output: Option<PathBuf>,
) -> EngineResult<(RunResult, PathBuf)> {
    let competence = Competence::parse(competence)?;
    let sources = load_sources(data)?;
    let result = run_benefit(&sources, competence, config)?;

    let path = output.unwrap_or_else(|| default_output_path(data, &Local::now()));
    write_output(&result.output, &path)?;
    Ok((result, path))
}

fn print_summary(result: &RunResult, path: &Path) {
    let summary = &result.summary;
    println!("Competence {} (run {})", result.competence, result.run_id);
    println!("  Employees merged: {}", summary.merged_records);
    println!("  Eligible: {}", summary.eligible);
    println!("  Output rows: {}", summary.output_rows);
    for (reason, count) in &summary.excluded_by_reason {
        println!("  Excluded ({:?}): {}", reason, count);
    }
    if !result.issues.is_empty() {
        println!("  Issues: {}", result.issues.len());
    }
    println!("  Total: R$ {}", summary.total_value);
    println!("  Employer share: R$ {}", summary.employer_total);
    println!("  Employee share: R$ {}", summary.employee_total);
    println!("Saved to {}", path.display());
}

async fn serve_command(config: BenefitConfig, addr: SocketAddr) -> EngineResult<()> {
    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;
    Ok(())
}
