//! Retry classification for sqlx errors.
//!
//! Transport failures (I/O, pool timeouts, protocol breakage, TLS errors that
//! read like a dropped connection) and the handful of SQLSTATEs that mean
//! "the server went away" are transient.
//! Everything else is a business error and is handed straight back.

use std::future::Future;

use archsite_core::retry::{is_network_error_message, is_transient_io, retry_with_backoff, RetryPolicy};

/// SQLSTATE codes that indicate the connection, not the query, failed.
const TRANSIENT_SQLSTATES: &[&str] = &["57P01", "57P02", "57P03", "53300"];

/// Whether a sqlx error is worth retrying on a fresh connection.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(io) => is_transient_io(io),
        // Certificate and handshake-configuration failures will not heal.
        sqlx::Error::Tls(tls) => is_network_error_message(&tls.to_string()),
        sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Protocol(_) => true,
        sqlx::Error::Database(db_err) => match db_err.code() {
            Some(code) => {
                let code: &str = &code;
                code.starts_with("08") || TRANSIENT_SQLSTATES.contains(&code)
            }
            None => is_network_error_message(db_err.message()),
        },
        sqlx::Error::RowNotFound
        | sqlx::Error::PoolClosed
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::Configuration(_) => false,
        other => is_network_error_message(&other.to_string()),
    }
}

/// Run a query, retrying transient failures under `policy`.
///
/// A non-transient error (constraint violation, missing row, decode
/// failure) comes back on the first attempt, untouched, for the caller to
/// map.
pub async fn retry_query<T, F, Fut>(policy: &RetryPolicy, op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    retry_with_backoff(policy, is_transient, op).await
}
