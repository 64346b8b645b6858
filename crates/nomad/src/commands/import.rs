//! `nomad import` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use nomad_site::import::{convert_scraped, to_ndjson};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the import command.
#[derive(Args)]
pub(crate) struct ImportArgs {
    /// Scraper output (JSON object keyed by country, or array of entries).
    input: PathBuf,

    /// Output file (default: input path with `.ndjson` extension).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ImportArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let target = self
            .output
            .unwrap_or_else(|| default_output_path(&self.input));
        let count = convert_file(&self.input, &target)?;

        output.success(&format!(
            "Wrote {count} documents to {}",
            target.display()
        ));
        output.info(&format!(
            "Import with: sanity dataset import {} <dataset>",
            target.display()
        ));
        Ok(())
    }
}

/// Convert `input` into newline-delimited documents at `target`.
fn convert_file(input: &Path, target: &Path) -> Result<usize, CliError> {
    let raw = fs::read_to_string(input)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).map_err(nomad_site::import::ImportError::from)?;
    let documents = convert_scraped(&value)?;
    fs::write(target, to_ndjson(&documents)?)?;
    tracing::info!(count = documents.len(), path = %target.display(), "Wrote import file");
    Ok(documents.len())
}

fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("ndjson")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("data/visa_data.json")),
            PathBuf::from("data/visa_data.ndjson")
        );
    }

    #[test]
    fn test_convert_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("visa_data.json");
        let target = dir.path().join("visa_data.ndjson");
        fs::write(
            &input,
            r#"{"spain": {"countryName": "Spain", "minMonthlyIncome": 2763},
                "italy": {"countryName": "Italy"}}"#,
        )
        .unwrap();

        let count = convert_file(&input, &target).unwrap();

        assert_eq!(count, 2);
        let written = fs::read_to_string(&target).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"_id\":\"visa-italy\""));
        assert!(lines[1].contains("\"_id\":\"visa-spain\""));
    }

    #[test]
    fn test_convert_file_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("broken.json");
        fs::write(&input, "{not json").unwrap();

        let err = convert_file(&input, &dir.path().join("out.ndjson")).unwrap_err();
        assert!(matches!(err, CliError::Import(_)));
    }
}
