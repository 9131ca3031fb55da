//! Export and import command implementations.

use crate::cli::{ExportArgs, ImportArgs};
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use crate::runtime::build_store;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use tabviz_store::{export_jsonl, import_jsonl};

/// Execute the export command.
pub async fn execute_export(
    args: ExportArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> Result<()> {
    let store = build_store(config)?;

    match args.path {
        Some(path) => {
            let file = File::create(&path)?;
            let count =
                tokio::task::spawn_blocking(move || export_jsonl(&store, BufWriter::new(file)))
                    .await??;
            println!(
                "{}",
                formatter.success(&format!("Exported {} exemplar(s) to {}", count, path.display()))
            );
        }
        None => {
            let count = tokio::task::spawn_blocking(move || {
                export_jsonl(&store, std::io::stdout().lock())
            })
            .await??;
            eprintln!("{}", formatter.info(&format!("Exported {} exemplar(s)", count)));
        }
    }
    Ok(())
}

/// Execute the import command.
pub async fn execute_import(
    args: ImportArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> Result<()> {
    if config.store.is_in_memory() {
        eprintln!(
            "{}",
            formatter.warning("store.database_path is :memory:, imported exemplars will not persist")
        );
    }

    let store = build_store(config)?;
    let file = File::open(&args.path)?;
    let report =
        tokio::task::spawn_blocking(move || import_jsonl(&store, BufReader::new(file))).await??;

    println!("{}", formatter.format_report("Imported", &report)?);
    Ok(())
}
