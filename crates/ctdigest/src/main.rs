use anyhow::{Context, Result};
use clap::Parser;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "ctdigest",
    about = "Congressional trade digest - polls public trade disclosures, dedupes against a seen-trade store, and emails a digest of new trades"
)]
struct Cli {
    /// Path to configuration file. Missing file means built-in defaults.
    #[arg(short, long, default_value = "config/ctdigest.toml")]
    config: String,

    /// Log the digest instead of emailing, and persist nothing.
    #[arg(long)]
    dry_run: bool,

    /// Pretty-print the run summary JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Absent file degrades to defaults; unreadable or unparseable is a hard
    // error (exit non-zero, let the next scheduled run retry).
    let mut config = ctdigest::load_config(&cli.config)?;
    config.overlay_env();

    let reconciler =
        ctdigest::build_reconciler(&config, cli.dry_run).context("Failed to build reconciler")?;

    let run_id = uuid::Uuid::new_v4();
    let summary = reconciler
        .run()
        .instrument(tracing::info_span!("digest_run", %run_id))
        .await;

    // Run summary as JSON to stdout
    let output = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{output}");

    Ok(())
}
