use std::collections::HashSet;

use log::debug;

use crate::data::model::{Column, Dataset};
use crate::error::{ParseErrorKind, PipelineError};

use super::schema::{FeatureGroup, FeatureSchema};

/// Separator between the code and the values of an encoded cell.
pub const VALUE_DELIMITER: char = ',';

/// An encoded cell split into its code and its raw value tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCell<'a> {
    pub code: &'a str,
    pub values: Vec<&'a str>,
}

/// Split `code,v_1,...,v_k` into code and value tokens. Tokens are trimmed.
pub fn split_encoded(cell: &str) -> Option<EncodedCell<'_>> {
    let mut tokens = cell.split(VALUE_DELIMITER).map(str::trim);
    let code = tokens.next().filter(|c| !c.is_empty())?;
    Some(EncodedCell {
        code,
        values: tokens.collect(),
    })
}

/// Parse every source column, build its [`FeatureGroup`], and materialize
/// one integer column per encoded value position.
///
/// The dataset only gains columns. Nothing is added unless every source
/// column parses.
pub fn expand_features(
    dataset: &mut Dataset,
    source_columns: &[String],
) -> Result<FeatureSchema, PipelineError> {
    let mut groups = Vec::with_capacity(source_columns.len());
    let mut expanded = Vec::new();

    for source in source_columns {
        let (group, columns) = expand_column(dataset, source)?;
        debug!(
            "{source}: code {} with {} values per row",
            group.code,
            group.width()
        );
        expanded.extend(group.derived_columns.iter().cloned().zip(columns));
        groups.push(group);
    }

    let mut seen = HashSet::new();
    for (name, _) in &expanded {
        if dataset.has_column(name) || !seen.insert(name.as_str()) {
            return Err(PipelineError::DuplicateColumn(name.clone()));
        }
    }

    for (name, values) in expanded {
        dataset.add_column(name, Column::Int(values))?;
    }

    Ok(FeatureSchema::new(groups))
}

fn expand_column(
    dataset: &Dataset,
    source: &str,
) -> Result<(FeatureGroup, Vec<Vec<i64>>), PipelineError> {
    let cells = dataset.text_column(source)?;

    let parse_error = |row: usize, kind: ParseErrorKind| PipelineError::Parse {
        column: source.to_string(),
        row,
        kind,
    };

    let parsed = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| {
            split_encoded(cell).ok_or_else(|| parse_error(row, ParseErrorKind::Empty))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let first = parsed
        .first()
        .ok_or_else(|| PipelineError::EmptyColumn(source.to_string()))?;
    let code = first.code;
    if let Some((row, cell)) = parsed.iter().enumerate().find(|(_, c)| c.code != code) {
        return Err(parse_error(
            row,
            ParseErrorKind::CodeMismatch {
                expected: code.to_string(),
                found: cell.code.to_string(),
            },
        ));
    }

    let k = parsed.iter().map(|c| c.values.len()).max().unwrap_or(0);
    if k == 0 {
        return Err(PipelineError::EmptyGroup(source.to_string()));
    }

    let mut columns = vec![Vec::with_capacity(parsed.len()); k];
    for (row, cell) in parsed.iter().enumerate() {
        if cell.values.len() < k {
            return Err(PipelineError::ShapeMismatch {
                column: source.to_string(),
                row,
                expected: k,
                found: cell.values.len(),
            });
        }
        for (column, token) in columns.iter_mut().zip(&cell.values) {
            let value = token.parse::<i64>().map_err(|source| {
                parse_error(
                    row,
                    ParseErrorKind::InvalidInteger {
                        token: (*token).to_string(),
                        source,
                    },
                )
            })?;
            column.push(value);
        }
    }

    Ok((FeatureGroup::new(source, code, k), columns))
}
