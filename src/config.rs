use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::loader::FileOptions;
use crate::pipeline::DEFAULT_SOURCE_COLUMN;

/// Settings of one preprocessing run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```json
/// { "source_columns": ["features", "extra"], "include_index": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Encoded columns to expand.
    pub source_columns: Vec<String>,
    /// Field delimiter, `"tab"` or a single ASCII character.
    #[serde(deserialize_with = "deserialize_delimiter")]
    pub delimiter: u8,
    /// Write the preprocessed dataset.
    pub save: bool,
    /// Write a leading row-index column.
    pub include_index: bool,
    /// Explicit output path instead of `preprocessed_<input name>`.
    pub output: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_columns: vec![DEFAULT_SOURCE_COLUMN.to_string()],
            delimiter: b'\t',
            save: true,
            include_index: false,
            output: None,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source_columns.is_empty() {
            bail!("at least one source column is required");
        }
        Ok(())
    }

    pub fn file_options(&self) -> FileOptions {
        FileOptions {
            delimiter: self.delimiter,
            include_index: self.include_index,
        }
    }
}

/// `tab`, `\t` or any single ASCII character.
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!("'{s}' is not a single ASCII character")),
            }
        }
    }
}

fn deserialize_delimiter<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_delimiter(&s).map_err(serde::de::Error::custom)
}
