// Export of generated batches to JSON and CSV files.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use tracing::info;

use squadmix_core::GeneratedBatch;

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "fantasy-teams.json",
            ExportFormat::Csv => "fantasy-teams.csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "JSON"),
            ExportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Pretty-printed JSON array of rosters, each `{ "players": [...] }`.
pub fn to_json(batch: &GeneratedBatch) -> Result<String> {
    serde_json::to_string_pretty(batch).context("failed to serialize teams to JSON")
}

/// Parse a document produced by `to_json`.
pub fn from_json(text: &str) -> Result<GeneratedBatch> {
    serde_json::from_str(text).context("failed to parse teams JSON")
}

/// Header line, written bare; only data fields are quoted.
const CSV_HEADER: &str = "Team Number,Player Name,Role\n";

/// One row per player: `Team Number, Player Name, Role`, every data field
/// quoted.
pub fn to_csv(batch: &GeneratedBatch) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(CSV_HEADER.as_bytes().to_vec());

    for (i, roster) in batch.iter().enumerate() {
        let team = format!("Team {}", i + 1);
        for player in &roster.players {
            writer
                .write_record([team.as_str(), player.name.as_str(), player.role.label()])
                .context("failed to write CSV row")?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write `batch` into `dir` in the given format and return the file path.
/// The directory is created if needed.
pub fn write_export(dir: &Path, batch: &GeneratedBatch, format: ExportFormat) -> Result<PathBuf> {
    if batch.is_empty() {
        bail!("no generated teams to export");
    }

    let content = match format {
        ExportFormat::Json => to_json(batch)?,
        ExportFormat::Csv => to_csv(batch)?,
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;
    let path = dir.join(format.file_name());
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("Exported {} teams as {} to {}", batch.len(), format, path.display());
    Ok(path)
}
