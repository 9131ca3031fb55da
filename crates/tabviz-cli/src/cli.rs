//! CLI command definitions and argument parsing.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tabviz - Turn numeric text into chart-ready records.
#[derive(Debug, Parser)]
#[command(name = "tabviz")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TABVIZ_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (chart type only)
    Quiet,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Quiet => OutputFormat::Quiet,
        }
    }
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract records from text and pick a chart type
    Analyze(AnalyzeArgs),

    /// Ingest a labeled CSV dataset as exemplars
    Ingest(IngestArgs),

    /// Export stored exemplars as JSON lines
    Export(ExportArgs),

    /// Import exemplars from JSON lines
    Import(ImportArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Serve the HTTP API
    Serve(ServeArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Text to analyze (reads stdin when omitted)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// CSV file with a `chart_type` column
    pub path: PathBuf,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Destination file (stdout when omitted)
    pub path: Option<PathBuf>,
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// JSON-lines file produced by `export`
    pub path: PathBuf,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Arguments for the serve command.
#[derive(Debug, Parser)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.bind_address`)
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to bind (overrides `server.bind_port`)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_inline_text() {
        let cli = Cli::try_parse_from(["tabviz", "analyze", "Q1: 10\nQ2: 12"]).unwrap();
        match cli.command {
            Command::Analyze(args) => {
                assert_eq!(args.text.as_deref(), Some("Q1: 10\nQ2: 12"));
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_analyze_text_and_file_conflict() {
        let result = Cli::try_parse_from(["tabviz", "analyze", "Q1: 10", "--file", "in.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tabviz", "ingest", "data.csv", "--format", "json", "--no-color", "-c", "alt.toml",
        ])
        .unwrap();
        assert_eq!(cli.format, Some(CliFormat::Json));
        assert!(cli.no_color);
        assert_eq!(cli.config.as_deref(), Some("alt.toml"));
        assert!(matches!(cli.command, Command::Ingest(_)));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from(["tabviz", "serve", "--bind", "0.0.0.0", "-p", "9000"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.bind.as_deref(), Some("0.0.0.0"));
                assert_eq!(args.port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::try_parse_from(["tabviz", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_format_conversion() {
        assert_eq!(OutputFormat::from(CliFormat::Quiet), OutputFormat::Quiet);
    }
}
