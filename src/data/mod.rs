//! Data layer: the in-memory table and file loading/saving.
//!
//! Architecture:
//! ```text
//!  .tsv / .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (typed columns)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  ordered named columns, gains derived columns
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  Dataset → preprocessed_<file name>
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
