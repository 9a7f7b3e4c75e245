use log::debug;

use crate::data::model::{Column, Dataset};
use crate::error::PipelineError;

use super::stats::{ColumnStats, NormalizationMapping};

/// Token inserted into the name of a standardized column.
pub const STANDARDIZED_TOKEN: &str = "stand";

/// A way of turning mapped columns into normalized ones.
///
/// Implementations carry their own parameters, so the orchestrator can swap
/// strategies without knowing about them.
pub trait NormalizationStrategy {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Add one normalized column per entry of `mapping`.
    fn normalize(
        &self,
        dataset: &mut Dataset,
        mapping: &NormalizationMapping,
    ) -> Result<(), PipelineError>;
}

/// Run any strategy over `dataset`.
pub fn normalize_with<S>(
    strategy: &S,
    dataset: &mut Dataset,
    mapping: &NormalizationMapping,
) -> Result<(), PipelineError>
where
    S: NormalizationStrategy + ?Sized,
{
    debug!("normalizing {} columns with {}", mapping.len(), strategy.name());
    strategy.normalize(dataset, mapping)
}

/// Insert `token` before the last `_`-separated segment of `column`:
/// `feature_7_3` → `feature_7_stand_3`.
///
/// A name without `_` gets the token in front: `x` → `stand_x`.
pub fn insert_name_token(column: &str, token: &str) -> String {
    let mut parts: Vec<&str> = column.split('_').collect();
    parts.insert(parts.len() - 1, token);
    parts.join("_")
}

/// Name of the standardized counterpart of `column`.
pub fn standardized_name(column: &str) -> String {
    insert_name_token(column, STANDARDIZED_TOKEN)
}

/// `(value - mean) / std` for every mapped column.
///
/// A zero standard deviation is an error instead of producing infinities.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZScore;

impl ZScore {
    pub fn transform(value: f64, stats: &ColumnStats) -> f64 {
        (value - stats.mean) / stats.std
    }

    pub fn inverse(z: f64, stats: &ColumnStats) -> f64 {
        z * stats.std + stats.mean
    }
}

impl NormalizationStrategy for ZScore {
    fn name(&self) -> &str {
        "z-score"
    }

    fn normalize(
        &self,
        dataset: &mut Dataset,
        mapping: &NormalizationMapping,
    ) -> Result<(), PipelineError> {
        let mut standardized = Vec::with_capacity(mapping.len());
        for (column, stats) in mapping.iter() {
            if stats.std == 0.0 || !stats.std.is_finite() {
                return Err(PipelineError::DegenerateStatistics {
                    column: column.to_string(),
                    reason: "standard deviation is zero or not finite",
                });
            }
            let values = dataset.numeric_column(column)?;
            let z = values.iter().map(|&v| Self::transform(v, stats)).collect();
            standardized.push((standardized_name(column), Column::Float(z)));
        }

        for (name, column) in standardized {
            dataset.add_column(name, column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_columns([
            ("feature_100_0".to_string(), Column::Int(vec![3, 4])),
            ("feature_100_1".to_string(), Column::Int(vec![9, 1])),
        ])
        .unwrap()
    }

    fn mapping() -> NormalizationMapping {
        let mut mapping = NormalizationMapping::default();
        mapping.insert(
            "feature_100_0",
            ColumnStats {
                mean: 3.5,
                std: 0.5_f64.sqrt(),
            },
        );
        mapping.insert(
            "feature_100_1",
            ColumnStats {
                mean: 5.0,
                std: 32.0_f64.sqrt(),
            },
        );
        mapping
    }

    #[test]
    fn token_goes_before_last_segment() {
        assert_eq!(standardized_name("feature_7_3"), "feature_7_stand_3");
        assert_eq!(standardized_name("feature_100_12"), "feature_100_stand_12");
        assert_eq!(standardized_name("feature_3"), "feature_stand_3");
        assert_eq!(standardized_name("score"), "stand_score");
        assert_eq!(insert_name_token("a_b", "x"), "a_x_b");
    }

    #[test]
    fn zscore_round_trips() {
        let stats = ColumnStats { mean: 5.0, std: 2.0 };
        let z = ZScore::transform(9.0, &stats);
        assert_eq!(z, 2.0);
        assert!((ZScore::inverse(z, &stats) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn adds_one_standardized_column_per_mapping_entry() {
        let mut ds = dataset();
        normalize_with(&ZScore, &mut ds, &mapping()).unwrap();

        assert_eq!(
            ds.column_names(),
            [
                "feature_100_0",
                "feature_100_1",
                "feature_100_stand_0",
                "feature_100_stand_1"
            ]
        );
        let Column::Float(z) = ds.column("feature_100_stand_1").unwrap() else {
            panic!("expected a float column");
        };
        let s = 32.0_f64.sqrt();
        assert!((z[0] - 4.0 / s).abs() < 1e-12);
        assert!((z[1] + 4.0 / s).abs() < 1e-12);
    }

    #[test]
    fn zero_std_is_rejected() {
        let mut ds = dataset();
        let mut mapping = NormalizationMapping::default();
        mapping.insert("feature_100_0", ColumnStats { mean: 3.0, std: 0.0 });

        assert!(matches!(
            ZScore.normalize(&mut ds, &mapping),
            Err(PipelineError::DegenerateStatistics { column, .. }) if column == "feature_100_0"
        ));
        assert_eq!(ds.column_names().len(), 2);
    }

    #[test]
    fn strategies_are_interchangeable() {
        struct Centered;

        impl NormalizationStrategy for Centered {
            fn name(&self) -> &str {
                "centered"
            }

            fn normalize(
                &self,
                dataset: &mut Dataset,
                mapping: &NormalizationMapping,
            ) -> Result<(), PipelineError> {
                for (column, stats) in mapping.iter() {
                    let values = dataset.numeric_column(column)?;
                    let centered = values.iter().map(|v| v - stats.mean).collect();
                    dataset.add_column(format!("{column}_centered"), Column::Float(centered))?;
                }
                Ok(())
            }
        }

        let strategy: Box<dyn NormalizationStrategy> = Box::new(Centered);
        let mut ds = dataset();
        normalize_with(strategy.as_ref(), &mut ds, &mapping()).unwrap();
        assert_eq!(
            ds.column("feature_100_0_centered").unwrap(),
            &Column::Float(vec![-0.5, 0.5])
        );
    }
}
