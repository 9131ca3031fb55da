//! Tabviz CLI - Turn numeric text into chart-ready records.

use clap::Parser;
use tabviz_cli::commands;
use tabviz_cli::{AppConfig, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(command: &Command) {
    let default_level = match command {
        Command::Serve(_) => "info",
        _ => "warn",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> tabviz_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.command);

    let path = AppConfig::path(cli.config.as_deref())?;
    let config = AppConfig::load(&path)?;

    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Analyze(args) => commands::execute_analyze(args, &config, &formatter).await?,
        Command::Ingest(args) => commands::execute_ingest(args, &config, &formatter).await?,
        Command::Export(args) => commands::execute_export(args, &config, &formatter).await?,
        Command::Import(args) => commands::execute_import(args, &config, &formatter).await?,
        Command::Config(args) => commands::execute_config(args, &config, &path, &formatter).await?,
        Command::Serve(args) => commands::execute_serve(args, config).await?,
    }

    Ok(())
}
