//! services/api/src/adapters/size_table.rs
//!
//! Loads the diaper size table from a TOML file, or falls back to the built-in
//! table when no file is configured. The table is validated once here so every
//! later recommendation can assume a well-formed, non-empty table.

use nestuity_core::domain::SizeSuggestion;
use nestuity_core::sizing::{SizeTable, SizeTableError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SizeTableLoadError {
    #[error("Failed to read size table at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse size table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] SizeTableError),
}

//=========================================================================================
// File Format
//=========================================================================================

#[derive(Deserialize)]
struct SizeTableFile {
    sizes: Vec<SizeRow>,
}

/// One `[[sizes]]` row. Unbounded limits are written as `inf` or left out.
#[derive(Deserialize)]
struct SizeRow {
    size: String,
    weight_min: Option<f64>,
    weight_max: Option<f64>,
    age_min_months: Option<f64>,
    age_max_months: Option<f64>,
    #[serde(default)]
    weight_range: String,
    #[serde(default)]
    avg_usage: String,
    #[serde(default)]
    age_range: String,
    #[serde(default)]
    per_box: String,
}

impl SizeRow {
    fn to_domain(self) -> SizeSuggestion {
        SizeSuggestion {
            size: self.size,
            weight_min: self.weight_min,
            weight_max: self.weight_max,
            age_min_months: self.age_min_months,
            age_max_months: self.age_max_months,
            weight_range: self.weight_range,
            avg_usage: self.avg_usage,
            age_range: self.age_range,
            per_box: self.per_box,
        }
    }
}

//=========================================================================================
// Loading
//=========================================================================================

/// Parses and validates a size table from TOML text.
pub fn parse_size_table(raw: &str) -> Result<SizeTable, SizeTableLoadError> {
    let file: SizeTableFile = toml::from_str(raw)?;
    let entries = file.sizes.into_iter().map(SizeRow::to_domain).collect();
    Ok(SizeTable::new(entries)?)
}

/// Loads the table from `path`, or returns the built-in table when `path` is `None`.
pub fn load_size_table(path: Option<&Path>) -> Result<SizeTable, SizeTableLoadError> {
    let Some(path) = path else {
        info!("No size table configured, using the built-in table.");
        return Ok(SizeTable::default_table());
    };

    let raw = std::fs::read_to_string(path).map_err(|source| SizeTableLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_size_table(&raw)?;
    info!("Loaded {} size rows from {}", table.len(), path.display());
    Ok(table)
}
