use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Number, Value as JsonValue};

use super::model::{CellValue, Column, Dataset};

/// Prefix of the file the preprocessed dataset is written to.
pub const OUTPUT_PREFIX: &str = "preprocessed_";

/// How delimited files are read and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOptions {
    /// Field delimiter of delimited files.
    pub delimiter: u8,
    /// Write a leading, unnamed row-index column.
    pub include_index: bool,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            include_index: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `[{ "features": "100,3,9,2", ...other columns }, ...]`
/// * anything else – delimited text with a header row, using
///   [`FileOptions::delimiter`]
pub fn load_file(path: &Path, options: &FileOptions) -> Result<Dataset> {
    if !path.is_file() {
        bail!("Input file {} does not exist", path.display());
    }
    match extension(path).as_str() {
        "json" => load_json(path),
        _ => load_delimited(path, options.delimiter),
    }
}

/// Write a dataset in the format implied by the extension of `path`.
pub fn save_file(dataset: &Dataset, path: &Path, options: &FileOptions) -> Result<()> {
    match extension(path).as_str() {
        "json" => save_json(dataset, path),
        _ => save_delimited(dataset, path, options),
    }
}

/// `dir/name.tsv` → `dir/preprocessed_name.tsv`
pub fn output_path(input: &Path) -> Result<PathBuf> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", input.display()))?;
    Ok(input.with_file_name(format!("{OUTPUT_PREFIX}{name}")))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Header row with column names, one record per row. Every column's type is
/// inferred from its cells.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {row_no}"))?;
        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let dataset = Dataset::from_columns(
        headers
            .into_iter()
            .zip(cells.into_iter().map(Column::from_text)),
    )?;
    Ok(dataset)
}

fn save_delimited(dataset: &Dataset, path: &Path, options: &FileOptions) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut header: Vec<&str> = Vec::with_capacity(dataset.column_names().len() + 1);
    if options.include_index {
        header.push("");
    }
    header.extend(dataset.column_names().iter().map(String::as_str));
    writer.write_record(&header).context("writing header")?;

    for row in 0..dataset.len() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if options.include_index {
            record.push(row.to_string());
        }
        record.extend(dataset.iter().map(|(_, column)| column.format_cell(row)));
        writer
            .write_record(&record)
            .with_context(|| format!("writing row {row}"))?;
    }

    writer.flush().context("flushing output")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 1, "features": "100,3,9,2" },
///   { "id": 2, "features": "100,4,1,8" }
/// ]
/// ```
///
/// Columns are the union of all keys, ordered by name. A key missing from a
/// row is a null cell.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    let keys: BTreeSet<&String> = records.iter().flat_map(|obj| obj.keys()).collect();

    let columns = keys.into_iter().map(|key| {
        let cells = records
            .iter()
            .map(|obj| obj.get(key).map_or(CellValue::Null, json_to_cell))
            .collect();
        (key.clone(), Column::from_cells(cells))
    });

    Ok(Dataset::from_columns(columns)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

fn cell_to_json(cell: CellValue) -> JsonValue {
    match cell {
        CellValue::String(s) => JsonValue::String(s),
        CellValue::Integer(i) => JsonValue::from(i),
        CellValue::Float(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        CellValue::Null => JsonValue::Null,
    }
}

fn save_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let records: Vec<JsonValue> = (0..dataset.len())
        .map(|row| {
            let obj: Map<String, JsonValue> = dataset
                .iter()
                .map(|(name, column)| (name.to_string(), cell_to_json(column.cell(row))))
                .collect();
            JsonValue::Object(obj)
        })
        .collect();

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &records).context("writing JSON")?;
    writer.flush().context("flushing output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_goes_next_to_input() {
        let out = output_path(Path::new("data/test.tsv")).unwrap();
        assert_eq!(out, Path::new("data/preprocessed_test.tsv"));
    }

    #[test]
    fn reads_tab_delimited_with_inferred_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.tsv");
        std::fs::write(&path, "id\tscore\tfeatures\n1\t0.5\t100,3,9,2\n2\t\t100,4,1,8\n").unwrap();

        let ds = load_file(&path, &FileOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names(), ["id", "score", "features"]);
        assert_eq!(ds.int_column("id").unwrap(), [1, 2]);
        assert_eq!(ds.text_column("features").unwrap(), ["100,3,9,2", "100,4,1,8"]);
        let score = ds.numeric_column("score").unwrap();
        assert_eq!(score[0], 0.5);
        assert!(score[1].is_nan());
    }

    #[test]
    fn writes_header_rows_and_optional_index() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.tsv");
        let ds = Dataset::from_columns([
            ("id".to_string(), Column::Int(vec![1, 2])),
            ("z".to_string(), Column::Float(vec![4.0, -0.5])),
        ])
        .unwrap();

        save_file(&ds, &path, &FileOptions::default()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "id\tz\n1\t4.0\n2\t-0.5\n"
        );

        let options = FileOptions {
            delimiter: b',',
            include_index: true,
        };
        save_file(&ds, &path, &options).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            ",id,z\n0,1,4.0\n1,2,-0.5\n"
        );
    }

    #[test]
    fn json_records_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "features": "100,3,9,2"}, {"features": "100,4,1,8", "id": 2}]"#,
        )
        .unwrap();

        let ds = load_file(&path, &FileOptions::default()).unwrap();
        assert_eq!(ds.column_names(), ["features", "id"]);
        assert_eq!(ds.int_column("id").unwrap(), [1, 2]);

        let out = dir.path().join("out.json");
        save_file(&ds, &out, &FileOptions::default()).unwrap();
        let reloaded = load_file(&out, &FileOptions::default()).unwrap();
        assert_eq!(reloaded.column("features").unwrap(), ds.column("features").unwrap());
    }

    #[test]
    fn missing_input_fails_before_reading() {
        let dir = tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.tsv"), &FileOptions::default()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "a\tb\n1\t2\n3\n").unwrap();
        assert!(load_file(&path, &FileOptions::default()).is_err());
    }
}
