//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use crate::runtime::build_store;
use std::fs::File;
use std::io::BufReader;
use tabviz_store::ingest_csv;

/// Execute the ingest command.
///
/// Embedding may call out over HTTP, so the store work runs on the
/// blocking pool.
pub async fn execute_ingest(
    args: IngestArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> Result<()> {
    if config.store.is_in_memory() {
        eprintln!(
            "{}",
            formatter.warning("store.database_path is :memory:, ingested exemplars will not persist")
        );
    }

    let store = build_store(config)?;
    let file = File::open(&args.path)?;
    let report =
        tokio::task::spawn_blocking(move || ingest_csv(&store, BufReader::new(file))).await??;

    println!("{}", formatter.format_report("Ingested", &report)?);
    Ok(())
}
