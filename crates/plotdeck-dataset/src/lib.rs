//! Tabular dataset storage for plotdeck.
//!
//! Datasets are plain CSV files in a single directory, one file per
//! dataset. Request-facing names use hyphens; storage-facing names use
//! underscores. Tables are materialized from disk on every read — there
//! is no cache and no in-memory identity across requests.

mod error;
mod sanitize;
mod store;
mod summary;
mod table;

pub use error::DatasetError;
pub use sanitize::sanitize_value;
pub use store::DatasetStore;
pub use summary::summarize;
pub use table::{Cell, Column, DataTable, Dtype};

pub type Result<T> = std::result::Result<T, DatasetError>;
