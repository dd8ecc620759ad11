use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitelens_audit::{load_bundle, report_schema, run_audit, AuditOptions};
use sitelens_common::Config;
use sitelens_validator::{HttpProber, ValidatorConfig};

#[derive(Parser)]
#[command(name = "sitelens")]
#[command(about = "Score, validate and explain a crawled web page")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a crawl bundle and print the report as JSON
    Audit {
        /// Path to the audit bundle JSON
        bundle: PathBuf,

        /// Free-form online-presence payload to overlay on the bundle
        #[arg(long)]
        presence: Option<PathBuf>,

        /// Skip every network probe
        #[arg(long, env = "SITELENS_OFFLINE")]
        offline: bool,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the JSON schema of the audit report
    Schema,
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("sitelens=info".parse()?);
    // Logs go to stderr so stdout stays a clean JSON document.
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    match cli.command {
        Commands::Audit {
            bundle,
            presence,
            offline,
            pretty,
        } => cmd_audit(bundle, presence, offline, pretty).await,
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&report_schema())?);
            Ok(())
        }
    }
}

async fn cmd_audit(
    bundle_path: PathBuf,
    presence_path: Option<PathBuf>,
    offline: bool,
    pretty: bool,
) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    config.offline |= offline;
    config.log_settings();

    let raw = std::fs::read_to_string(&bundle_path)
        .with_context(|| format!("Failed to read {}", bundle_path.display()))?;
    let presence = presence_path
        .map(|p| {
            std::fs::read_to_string(&p).with_context(|| format!("Failed to read {}", p.display()))
        })
        .transpose()?;
    let bundle = load_bundle(&raw, presence.as_deref())?;

    let options = AuditOptions::from(&config);
    let prober = HttpProber::new(&ValidatorConfig::from(&config))
        .context("Failed to build HTTP prober")?;

    let report = run_audit(&bundle, &options, &prober).await;
    info!(run_id = %report.run_id, "Writing report");

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
