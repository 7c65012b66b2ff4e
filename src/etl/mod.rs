//! ETL core: normalization, classification, and record building.
//!
//! - [`normalize`] - wide matrix → long-form rows
//! - [`classify`] - one raw cell → one classification
//! - [`builder`] - long-form rows → clean [`crate::models::Record`] set
//! - [`pipeline`] - file/bytes → [`pipeline::Dataset`]

pub mod builder;
pub mod classify;
pub mod normalize;
pub mod pipeline;

pub use builder::{build, normalize_training_label};
pub use classify::classify;
pub use normalize::{normalize, NormalizedMatrix, IDENTITY_COLUMNS};
pub use pipeline::{load_bytes, load_file, Dataset, LoadInfo};
