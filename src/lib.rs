//! Tabular dataset pipeline: ingest delimited text, filter rows through named
//! column predicates, project them into chart series, and persist the
//! filter + chart configuration per user.

pub mod chart;
pub mod color;
pub mod data;
pub mod error;
pub mod settings;
pub mod state;
pub mod store;
pub mod table;

pub use error::{Error, Result};
pub use state::SessionState;
