//! Transactional execution with prefix-commit semantics.
//!
//! A batch commit is best-effort and order-sensitive: the first failing
//! statement stops iteration, and the statements that already executed are
//! committed anyway. Downstream row counts depend on exactly this contract,
//! so a statement failure must never abort the transaction; only a failure
//! of the transaction machinery itself (begin/commit) rolls back.

use crate::error::DbError;
use crate::session::SqlSession;
use crate::statement::Statement;

/// How a batch commit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every statement executed and the transaction committed.
    Complete { applied: usize },
    /// Statement `failed_index` failed; the transaction still committed,
    /// durably applying exactly the statements before it. Everything from
    /// the failing statement on was never applied.
    Truncated { applied: usize, failed_index: usize },
}

impl CommitOutcome {
    /// Rows durably persisted by the commit.
    pub fn applied(&self) -> usize {
        match *self {
            CommitOutcome::Complete { applied } => applied,
            CommitOutcome::Truncated { applied, .. } => applied,
        }
    }
}

/// Execute `statements` in order inside one transaction.
///
/// A single statement failure is logged together with the offending
/// statement text and truncates the batch: the successful prefix commits,
/// the rest is skipped. Begin or commit failing rolls the whole call back
/// and nothing persists.
pub async fn commit_batch<S: SqlSession>(
    session: &mut S,
    statements: &[Statement],
) -> Result<CommitOutcome, DbError> {
    if let Err(e) = session.begin().await {
        tracing::error!(error = %e, "failed to begin transaction");
        return Err(DbError::Transaction(e));
    }

    let mut applied = 0;
    let mut failed_index = None;
    for (index, statement) in statements.iter().enumerate() {
        match session.execute(statement.sql()).await {
            Ok(_) => applied += 1,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    statement = statement.sql(),
                    "statement failed, truncating the batch"
                );
                failed_index = Some(index);
                break;
            }
        }
    }

    match session.commit().await {
        Ok(()) => Ok(match failed_index {
            None => CommitOutcome::Complete { applied },
            Some(failed_index) => CommitOutcome::Truncated {
                applied,
                failed_index,
            },
        }),
        Err(e) => {
            tracing::error!(error = %e, "commit failed, rolling back");
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed after commit error");
            }
            Err(DbError::Transaction(e))
        }
    }
}

/// Execute exactly one statement in its own transaction.
///
/// With a single statement there is no prefix to salvage: any failure rolls
/// the transaction back and surfaces as an error.
pub async fn commit_single<S: SqlSession>(
    session: &mut S,
    statement: &Statement,
) -> Result<(), DbError> {
    if let Err(e) = session.begin().await {
        tracing::error!(error = %e, "failed to begin transaction");
        return Err(DbError::Transaction(e));
    }

    if let Err(e) = session.execute(statement.sql()).await {
        tracing::error!(
            error = %e,
            statement = statement.sql(),
            "statement failed, rolling back"
        );
        if let Err(rollback_err) = session.rollback().await {
            tracing::error!(error = %rollback_err, "rollback failed after statement error");
        }
        return Err(DbError::Transaction(e));
    }

    match session.commit().await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "commit failed, rolling back");
            if let Err(rollback_err) = session.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed after commit error");
            }
            Err(DbError::Transaction(e))
        }
    }
}
