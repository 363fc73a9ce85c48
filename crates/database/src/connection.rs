//! Verified-live session acquisition.
//!
//! The router owns one session and hides the reconnect dance from callers:
//! every acquisition probes the current session, and a failed probe discards
//! the stale handle, waits out the backoff, dials a new session and verifies
//! it again. Only probe failures are retried; a failure of the connect
//! capability itself surfaces immediately.

use crate::error::DbError;
use crate::session::{Connector, SqlSession};
use std::time::Duration;

/// Reconnect policy for the router.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Pause between discarding a stale session and dialing a new one.
    pub probe_backoff: Duration,
    /// Ceiling on reconnect attempts per acquisition. `None` keeps retrying
    /// until the connect call itself fails, which suits a long-running
    /// batch worker but not a request-serving path.
    pub max_reconnects: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            probe_backoff: Duration::from_secs(1),
            max_reconnects: None,
        }
    }
}

/// Owns the single database session of one worker.
///
/// The session is established lazily on first acquisition, replaced when a
/// probe fails, and torn down by [`close`](Self::close). At most one live
/// handle exists at any time.
pub struct ConnectionRouter<C: Connector> {
    connector: C,
    policy: RetryPolicy,
    session: Option<C::Session>,
}

impl<C: Connector> ConnectionRouter<C> {
    pub fn new(connector: C) -> Self {
        Self::with_policy(connector, RetryPolicy::default())
    }

    pub fn with_policy(connector: C, policy: RetryPolicy) -> Self {
        Self {
            connector,
            policy,
            session: None,
        }
    }

    /// Borrow the session, verified live.
    ///
    /// A fresh session is probed before it is handed out, so the caller
    /// always gets a handle that answered a probe after any reconnect.
    pub async fn session(&mut self) -> Result<&mut C::Session, DbError> {
        let mut reconnects: u32 = 0;
        loop {
            let mut session = match self.session.take() {
                Some(session) => session,
                None => match self.connector.connect().await {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::error!(error = %e, "database connect failed");
                        return Err(DbError::Connect(e));
                    }
                },
            };

            match session.probe().await {
                Ok(()) => return Ok(self.session.insert(session)),
                Err(e) => {
                    tracing::warn!(error = %e, "connection failed its liveness probe, reconnecting");
                    drop(session);
                    if let Some(max) = self.policy.max_reconnects {
                        if reconnects >= max {
                            return Err(DbError::ReconnectExhausted {
                                attempts: reconnects,
                            });
                        }
                    }
                    reconnects += 1;
                    tokio::time::sleep(self.policy.probe_backoff).await;
                }
            }
        }
    }

    /// Tear the session down cleanly. The router is consumed; a worker
    /// builds a new one for its next run.
    pub async fn close(mut self) -> Result<(), DbError> {
        if let Some(session) = self.session.take() {
            session.close().await.map_err(DbError::Close)?;
        }
        Ok(())
    }
}
