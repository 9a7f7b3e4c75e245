use std::collections::HashMap;

use log::debug;

use crate::data::model::Dataset;
use crate::error::PipelineError;

use super::schema::FeatureSchema;

/// Mean and standard deviation of one column.
///
/// The standard deviation is the sample one (N-1 denominator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

impl ColumnStats {
    /// Computes mean and sample standard deviation.
    ///
    /// # Returns
    ///
    /// * `Some(ColumnStats)` - if there are at least two values
    /// * `None` - otherwise, since the sample standard deviation is undefined
    ///
    /// # Examples
    ///
    /// ```
    /// # use rusty_features::pipeline::stats::ColumnStats;
    /// let stats = ColumnStats::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
    /// assert_eq!(stats.mean, 5.0);
    /// assert!((stats.std - 2.138_089_935).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < 2 {
            return None;
        }
        let mean = mean(values)?;
        let n = values.len() as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        Some(Self {
            mean,
            std: variance.sqrt(),
        })
    }
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Column name → [`ColumnStats`], keeping the order columns were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationMapping {
    entries: Vec<(String, ColumnStats)>,
    index: HashMap<String, usize>,
}

impl NormalizationMapping {
    /// Add or replace the statistics of `column`.
    pub fn insert(&mut self, column: impl Into<String>, stats: ColumnStats) {
        let column = column.into();
        match self.index.get(&column) {
            Some(&i) => self.entries[i].1 = stats,
            None => {
                self.index.insert(column.clone(), self.entries.len());
                self.entries.push((column, stats));
            }
        }
    }

    pub fn get(&self, column: &str) -> Option<&ColumnStats> {
        self.index.get(column).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnStats)> {
        self.entries.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Mean and standard deviation of every derived column in `schema`.
///
/// The dataset is only read.
pub fn collect_statistics(
    dataset: &Dataset,
    schema: &FeatureSchema,
) -> Result<NormalizationMapping, PipelineError> {
    let mut mapping = NormalizationMapping::default();
    for group in schema.groups() {
        for column in &group.derived_columns {
            let values = dataset.numeric_column(column)?;
            let stats = ColumnStats::from_values(&values).ok_or_else(|| {
                PipelineError::DegenerateStatistics {
                    column: column.clone(),
                    reason: "fewer than two values, standard deviation is undefined",
                }
            })?;
            debug!("{column}: mean {} std {}", stats.mean, stats.std);
            mapping.insert(column.clone(), stats);
        }
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;
    use crate::pipeline::schema::FeatureGroup;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(vec![FeatureGroup::new("features", "100", 3)])
    }

    fn dataset() -> Dataset {
        Dataset::from_columns([
            ("feature_100_0".to_string(), Column::Int(vec![3, 4])),
            ("feature_100_1".to_string(), Column::Int(vec![9, 1])),
            ("feature_100_2".to_string(), Column::Int(vec![2, 8])),
        ])
        .unwrap()
    }

    #[test]
    fn mean_and_sample_std_per_column() {
        let mapping = collect_statistics(&dataset(), &schema()).unwrap();
        assert_eq!(mapping.len(), 3);

        let col0 = mapping.get("feature_100_0").unwrap();
        assert_eq!(col0.mean, 3.5);
        assert!((col0.std - 0.5_f64.sqrt()).abs() < 1e-12);

        let col1 = mapping.get("feature_100_1").unwrap();
        assert_eq!(col1.mean, 5.0);
        assert!((col1.std - 32.0_f64.sqrt()).abs() < 1e-12);

        let names: Vec<_> = mapping.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["feature_100_0", "feature_100_1", "feature_100_2"]);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let ds = dataset();
        let first = collect_statistics(&ds, &schema()).unwrap();
        let second = collect_statistics(&ds, &schema()).unwrap();
        for ((_, a), (_, b)) in first.iter().zip(second.iter()) {
            assert_eq!(a.mean.to_bits(), b.mean.to_bits());
            assert_eq!(a.std.to_bits(), b.std.to_bits());
        }
    }

    #[test]
    fn too_few_rows_is_degenerate() {
        let ds = Dataset::from_columns([("feature_1_0".to_string(), Column::Int(vec![5]))])
            .unwrap();
        let schema = FeatureSchema::new(vec![FeatureGroup::new("f", "1", 1)]);
        assert!(matches!(
            collect_statistics(&ds, &schema),
            Err(PipelineError::DegenerateStatistics { .. })
        ));
        assert!(ColumnStats::from_values(&[]).is_none());
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn missing_derived_column_is_reported() {
        let ds = Dataset::default();
        assert!(matches!(
            collect_statistics(&ds, &schema()),
            Err(PipelineError::MissingColumn(_))
        ));
    }
}
