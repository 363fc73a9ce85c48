//! # Findata Core Types
//!
//! The shared vocabulary of the ingestion pipeline: scalar [`Value`]s as
//! produced by the schema validator, positional [`Row`]s, and the [`Batch`]
//! that carries one upload's worth of rows for a single destination table.
//!
//! A batch owns its column list once; rows are stored positionally and a row
//! whose arity disagrees with the column list is rejected at `push`. Statement
//! generation downstream is positional and relies on that invariant.

pub mod batch;
pub mod error;
pub mod value;

// Re-export the core types to provide a clean, public-facing API.
pub use batch::{Batch, Row};
pub use error::CoreError;
pub use value::Value;
