//! The bulk-then-upsert orchestration for one batch.

use crate::commit::{CommitOutcome, commit_batch};
use crate::session::SqlSession;
use crate::statement::{BULK_CHUNK_ROWS, build_batch, build_bulk_insert};
use core_types::Batch;

/// What actually happened to a batch, so callers can tell "all rows",
/// "first N rows" and "nothing" apart without reading logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadReport {
    /// Rows in the input batch.
    pub rows: usize,
    /// Whether every bulk append chunk executed cleanly. Informational
    /// only: the upsert commit runs regardless.
    pub bulk_appended: bool,
    /// Rows durably applied by the upsert commit.
    pub applied: usize,
    /// Index of the statement that stopped the batch early, if any.
    pub truncated_at: Option<usize>,
    /// True when the transaction machinery failed and the upsert commit
    /// persisted nothing.
    pub rolled_back: bool,
}

/// Persist `batch` into `table`: a best-effort bulk append, then the
/// row-by-row upsert commit over the full batch.
///
/// The append exists only to dodge per-row conflict handling on fresh
/// data; its failure is swallowed (and recorded in the report), and even
/// its success flows into the upsert commit, so every non-empty upload
/// ends in the same idempotent path. Faults are logged and reported, never
/// raised; the pipeline moves on to its next batch.
pub async fn upload<S: SqlSession>(session: &mut S, table: &str, batch: &Batch) -> UploadReport {
    let mut report = UploadReport {
        rows: batch.len(),
        ..UploadReport::default()
    };

    if batch.is_empty() {
        tracing::debug!(table, "empty batch, nothing to upload");
        return report;
    }

    report.bulk_appended = bulk_append(session, table, batch).await;

    let statements = build_batch(table, batch);
    for (index, statement) in statements.iter().enumerate() {
        if !statement.has_update_clause() {
            tracing::warn!(
                table,
                row = index,
                "row rendered an empty update clause and will fail as a statement"
            );
        }
    }

    match commit_batch(session, &statements).await {
        Ok(CommitOutcome::Complete { applied }) => {
            report.applied = applied;
        }
        Ok(CommitOutcome::Truncated {
            applied,
            failed_index,
        }) => {
            report.applied = applied;
            report.truncated_at = Some(failed_index);
        }
        Err(_) => {
            // Already logged where it happened; the report carries the outcome.
            report.rolled_back = true;
        }
    }

    tracing::info!(
        table,
        rows = report.rows,
        applied = report.applied,
        bulk_appended = report.bulk_appended,
        "upload finished"
    );
    report
}

/// Run the chunked append inserts; true only when every chunk succeeded.
async fn bulk_append<S: SqlSession>(session: &mut S, table: &str, batch: &Batch) -> bool {
    for sql in build_bulk_insert(table, batch, BULK_CHUNK_ROWS) {
        if let Err(e) = session.execute(&sql).await {
            tracing::debug!(error = %e, table, "bulk append failed, relying on the upsert path");
            return false;
        }
    }
    true
}
