//! The seam between the pipeline and the store.
//!
//! [`SqlSession`] is the full set of operations the pipeline ever issues
//! against the database: a liveness probe, raw statement execution, and
//! transaction control. Keeping it a trait lets the tests script a session
//! the same way the live MySQL one behaves, without a server.

use sqlx::{Connection, MySqlConnection};

/// The trivial query used solely to test connection liveness.
const PROBE_SQL: &str = "SELECT 1 + 1";

/// One live database session. Exactly one exists per router; callers borrow
/// it for the duration of a single operation.
pub trait SqlSession: Send {
    /// Trivial liveness probe.
    async fn probe(&mut self) -> Result<(), sqlx::Error>;

    /// Execute one statement of raw SQL text, returning the affected row
    /// count. Statements run inside the current transaction when one has
    /// been begun on this session.
    async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error>;

    async fn begin(&mut self) -> Result<(), sqlx::Error>;

    async fn commit(&mut self) -> Result<(), sqlx::Error>;

    async fn rollback(&mut self) -> Result<(), sqlx::Error>;

    /// Cleanly close the underlying connection.
    async fn close(self) -> Result<(), sqlx::Error>
    where
        Self: Sized;
}

/// The opaque connect capability handed to the router. The router does not
/// care how a session is built or how often this gets invoked across the
/// process lifetime.
pub trait Connector: Send + Sync {
    type Session: SqlSession;

    async fn connect(&self) -> Result<Self::Session, sqlx::Error>;
}

/// A live MySQL session over a single `sqlx` connection.
///
/// All statements here are pre-rendered text, so execution goes through the
/// text protocol (`raw_sql`) rather than prepared statements; transaction
/// control does the same, keeping begin/commit/rollback visible in the
/// statement trail exactly as the store sees them.
pub struct MySqlSession {
    conn: MySqlConnection,
}

impl SqlSession for MySqlSession {
    async fn probe(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(PROBE_SQL)
            .execute(&mut self.conn)
            .await
            .map(|_| ())
    }

    async fn execute(&mut self, sql: &str) -> Result<u64, sqlx::Error> {
        sqlx::raw_sql(sql)
            .execute(&mut self.conn)
            .await
            .map(|result| result.rows_affected())
    }

    async fn begin(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("START TRANSACTION")
            .execute(&mut self.conn)
            .await
            .map(|_| ())
    }

    async fn commit(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("COMMIT")
            .execute(&mut self.conn)
            .await
            .map(|_| ())
    }

    async fn rollback(&mut self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql("ROLLBACK")
            .execute(&mut self.conn)
            .await
            .map(|_| ())
    }

    async fn close(self) -> Result<(), sqlx::Error> {
        self.conn.close().await
    }
}

/// Connects [`MySqlSession`]s from a configured store URL.
pub struct MySqlConnector {
    url: String,
}

impl MySqlConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Connector for MySqlConnector {
    type Session = MySqlSession;

    async fn connect(&self) -> Result<MySqlSession, sqlx::Error> {
        let conn = MySqlConnection::connect(&self.url).await?;
        Ok(MySqlSession { conn })
    }
}
