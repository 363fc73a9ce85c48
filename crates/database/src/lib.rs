//! # Findata Database Crate
//!
//! The resilient write path between validated batches and the MySQL store.
//!
//! ## Architectural Principles
//!
//! - **One worker, one session:** a [`ConnectionRouter`] owns exactly one
//!   connection, verifies liveness before every use, and self-heals by
//!   reconnecting when a probe fails. Callers borrow the session for the
//!   duration of one operation.
//! - **Idempotent writes:** every row becomes an
//!   `INSERT ... ON DUPLICATE KEY UPDATE` statement, so re-running a batch
//!   never duplicates data keyed by the table's unique constraint.
//! - **Best-effort batches:** a batch commit is order-sensitive and
//!   prefix-applied: a failing statement truncates the batch rather than
//!   aborting it, while a failure of the transaction machinery itself rolls
//!   everything back. [`CommitOutcome`] and [`UploadReport`] make the
//!   distinction visible to callers.
//!
//! ## Public API
//!
//! - [`ConnectionRouter`] / [`RetryPolicy`]: verified-live session on demand.
//! - [`SqlSession`] / [`Connector`]: the seam to the store, with live MySQL
//!   implementations.
//! - [`build_statement`] / [`build_batch`] / [`build_bulk_insert`]: SQL
//!   generation with the escaping contract.
//! - [`commit_batch`] / [`commit_single`]: transactional execution.
//! - [`upload`]: the bulk-then-upsert orchestration for one batch.
//! - [`DbError`]: the specific error types that can be returned from this
//!   crate.

// Declare the modules that constitute this crate.
pub mod commit;
pub mod connection;
pub mod error;
pub mod session;
pub mod statement;
pub mod upload;

// Re-export the key components to create a clean, public-facing API.
pub use commit::{CommitOutcome, commit_batch, commit_single};
pub use connection::{ConnectionRouter, RetryPolicy};
pub use error::DbError;
pub use session::{Connector, MySqlConnector, MySqlSession, SqlSession};
pub use statement::{
    BULK_CHUNK_ROWS, Statement, build_batch, build_bulk_insert, build_statement,
};
pub use upload::{UploadReport, upload};
