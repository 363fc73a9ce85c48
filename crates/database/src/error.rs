use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The connect capability itself failed. The router does not retry
    /// these; they surface to the caller of the current acquisition.
    #[error("Failed to establish a database connection: {0}")]
    Connect(#[source] sqlx::Error),

    /// The configured reconnect ceiling was reached with the liveness
    /// probe still failing.
    #[error("Gave up on the connection after {attempts} reconnect attempts")]
    ReconnectExhausted { attempts: u32 },

    /// Begin or commit failed; the transaction was rolled back in full and
    /// nothing from the call persisted.
    #[error("Transaction failed and was rolled back: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("Failed to close the database connection cleanly: {0}")]
    Close(#[source] sqlx::Error),
}
