//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::AppConfig;
use crate::error::Result;
use crate::output::Formatter;
use crate::runtime::{build_pipeline, build_store};
use std::io::Read;
use std::sync::Arc;

/// Read the input text from the argument, a file, or stdin.
pub fn read_input(args: &AnalyzeArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(path) = &args.file {
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &AppConfig,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_input(&args)?;

    let store = Arc::new(build_store(config)?);
    let pipeline = build_pipeline(config, store);
    let output = pipeline.process(&text).await;

    println!("{}", formatter.format_output(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_text_wins() {
        let args = AnalyzeArgs {
            text: Some("Q1: 10".to_string()),
            file: None,
        };
        assert_eq!(read_input(&args).unwrap(), "Q1: 10");
    }

    #[test]
    fn test_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "month,sales\nJan,100\n").unwrap();

        let args = AnalyzeArgs {
            text: None,
            file: Some(path),
        };
        assert_eq!(read_input(&args).unwrap(), "month,sales\nJan,100\n");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let args = AnalyzeArgs {
            text: None,
            file: Some("/nonexistent/input.txt".into()),
        };
        assert!(matches!(read_input(&args), Err(crate::error::CliError::Io(_))));
    }
}
