//! Feature preprocessing for tabular data whose feature groups are stored as
//! encoded strings (`code,v_1,...,v_k`).
//!
//! A run expands every encoded column into integer columns, collects their
//! mean and standard deviation, derives argmax features per group and adds
//! z-scored copies of the expanded columns.
//!
//! ```
//! use rusty_features::data::model::{Column, Dataset};
//! use rusty_features::pipeline;
//!
//! let mut dataset = Dataset::from_columns([(
//!     "features".to_string(),
//!     Column::Text(vec!["100,3,9,2".into(), "100,4,1,8".into()]),
//! )])
//! .unwrap();
//!
//! let run = pipeline::preprocess(&mut dataset, &["features".to_string()]).unwrap();
//! assert_eq!(run.mapping.get("feature_100_1").unwrap().mean, 5.0);
//! assert_eq!(dataset.int_column("max_feature_100_index").unwrap(), [1, 2]);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
