use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::load_settings;
use database::{ConnectionRouter, MySqlConnector, RetryPolicy, upload};
use schema::check_schema;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// The main entry point for the findata ingestion pipeline.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments and execute the appropriate command.
    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest(args) => handle_ingest(args).await,
    }
}

/// Resilient uploader for scraped Taiwan market datasets.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scraped records and upsert them into the store.
    Ingest(IngestArgs),
}

#[derive(Parser)]
struct IngestArgs {
    /// The dataset the records belong to (e.g. "taiwan_stock_price").
    #[arg(long)]
    dataset: String,

    /// Path to a JSON file holding an array of raw record mappings.
    #[arg(long)]
    input: PathBuf,

    /// Destination table; defaults to the dataset name.
    #[arg(long)]
    table: Option<String>,
}

/// Handles one ingestion pass: read, validate, upload, report.
async fn handle_ingest(args: IngestArgs) -> anyhow::Result<()> {
    let settings = load_settings().context("failed to load configuration")?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let records: Vec<schema::RawRecord> =
        serde_json::from_str(&raw).context("input is not a JSON array of record mappings")?;

    // A validation failure aborts the batch before it reaches the store.
    let batch = check_schema(&args.dataset, &records)?;
    let table = args.table.unwrap_or_else(|| args.dataset.clone());
    tracing::info!(dataset = %args.dataset, table = %table, rows = batch.len(), "starting upload");

    let db = &settings.database;
    let policy = RetryPolicy {
        probe_backoff: Duration::from_secs(db.probe_backoff_secs),
        max_reconnects: db.max_reconnects,
    };
    let mut router =
        ConnectionRouter::with_policy(MySqlConnector::new(db.connection_url()), policy);

    let session = router.session().await?;
    let report = upload(session, &table, &batch).await;

    println!(
        "{}: {} rows in, {} applied{}{}",
        table,
        report.rows,
        report.applied,
        report
            .truncated_at
            .map(|index| format!(", truncated at row {}", index))
            .unwrap_or_default(),
        if report.rolled_back {
            ", rolled back"
        } else {
            ""
        },
    );

    router.close().await?;
    Ok(())
}
