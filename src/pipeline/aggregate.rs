use log::debug;

use crate::data::model::{Column, Dataset};
use crate::error::PipelineError;

use super::schema::{FeatureGroup, FeatureSchema};
use super::stats::mean;

/// Index of the largest value; the first one wins on ties.
pub fn argmax<I>(values: I) -> Option<(usize, i64)>
where
    I: IntoIterator<Item = i64>,
{
    values
        .into_iter()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, max)) if v <= max => best,
            _ => Some((i, v)),
        })
}

/// Adds `max_feature_<code>_index` and `max_feature_<code>_abs_mean_diff` for
/// every group.
///
/// The diff is the row maximum minus the dataset-wide mean of the column the
/// maximum was found in. It is signed, the name notwithstanding.
pub fn derive_max_features(
    dataset: &mut Dataset,
    schema: &FeatureSchema,
) -> Result<(), PipelineError> {
    let mut derived = Vec::with_capacity(schema.len() * 2);
    for group in schema.groups() {
        let (indices, diffs) = derive_group(dataset, group)?;
        debug!("{}: derived argmax features", group.source);
        derived.push((group.max_index_column(), Column::Int(indices)));
        derived.push((group.abs_mean_diff_column(), Column::Float(diffs)));
    }

    for (name, column) in derived {
        dataset.add_column(name, column)?;
    }
    Ok(())
}

fn derive_group(
    dataset: &Dataset,
    group: &FeatureGroup,
) -> Result<(Vec<i64>, Vec<f64>), PipelineError> {
    let columns = group
        .derived_columns
        .iter()
        .map(|name| dataset.int_column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let means = columns
        .iter()
        .zip(&group.derived_columns)
        .map(|(values, name)| {
            let values = values.iter().map(|&v| v as f64).collect::<Vec<_>>();
            mean(&values).ok_or_else(|| PipelineError::EmptyColumn(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut indices = Vec::with_capacity(dataset.len());
    let mut diffs = Vec::with_capacity(dataset.len());
    for row in 0..dataset.len() {
        let (index, max) = argmax(columns.iter().map(|c| c[row]))
            .ok_or_else(|| PipelineError::EmptyGroup(group.source.clone()))?;
        indices.push(index as i64);
        diffs.push(max as f64 - means[index]);
    }

    Ok((indices, diffs))
}
