//! Feature pipeline: expansion, statistics, argmax features and normalization.
//!
//! Architecture:
//! ```text
//!   Dataset (encoded source columns)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  expand   │  split `code,v_1,..,v_k` → feature_<code>_<i> + FeatureSchema
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  stats    │  mean / sample std per derived column → NormalizationMapping
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ aggregate │  max_feature_<code>_index, max_feature_<code>_abs_mean_diff
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ normalize │  strategy (z-score) → <name>_stand_<last>
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod expand;
pub mod normalize;
pub mod schema;
pub mod stats;

use log::info;

use crate::data::model::Dataset;
use crate::error::PipelineError;

use self::normalize::{NormalizationStrategy, ZScore};
use self::schema::FeatureSchema;
use self::stats::NormalizationMapping;

/// Default encoded source column.
pub const DEFAULT_SOURCE_COLUMN: &str = "features";

/// What a run built besides the new columns. Only lives as long as the caller
/// keeps it.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub schema: FeatureSchema,
    pub mapping: NormalizationMapping,
}

/// Run every stage with z-score normalization.
pub fn preprocess(
    dataset: &mut Dataset,
    source_columns: &[String],
) -> Result<PipelineRun, PipelineError> {
    preprocess_with(dataset, source_columns, &ZScore)
}

/// Run every stage, normalizing with `strategy`.
///
/// On error the dataset may already hold the columns of earlier stages; the
/// caller is expected to drop it.
pub fn preprocess_with<S>(
    dataset: &mut Dataset,
    source_columns: &[String],
    strategy: &S,
) -> Result<PipelineRun, PipelineError>
where
    S: NormalizationStrategy + ?Sized,
{
    let schema = expand::expand_features(dataset, source_columns)?;
    info!(
        "Expanded {} source column(s) into {} feature columns",
        schema.len(),
        schema.derived_columns().count()
    );

    let mapping = stats::collect_statistics(dataset, &schema)?;
    info!("Collected statistics for {} columns", mapping.len());

    aggregate::derive_max_features(dataset, &schema)?;
    info!("Derived argmax features for {} group(s)", schema.len());

    normalize::normalize_with(strategy, dataset, &mapping)?;
    info!("Normalized {} columns with {}", mapping.len(), strategy.name());

    Ok(PipelineRun { schema, mapping })
}
