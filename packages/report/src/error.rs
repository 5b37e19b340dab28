//! Typed errors for the report library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors from asking the answer service a single question.
///
/// These are per-cell: the report builder records the `"Error"` sentinel for
/// the failed cell and continues, so an `AskError` never aborts a row or a
/// batch.
#[derive(Debug, Error)]
pub enum AskError {
    /// The service answered with an error (non-2xx, rate limit, bad request)
    #[error("answer service error: {0}")]
    Service(String),

    /// The request never completed (connection failure, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The service returned an empty answer
    #[error("empty response from answer service")]
    Empty,
}

/// Errors from the persisted report store.
///
/// Store errors are fatal for the current pipeline run: no partial write is
/// ever sent, and previously persisted data is left untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The version token was stale; the report changed under us
    #[error("version token is stale: report was modified concurrently")]
    Conflict,

    /// The store could not be reached or answered with an error
    #[error("store transport error: {0}")]
    Transport(String),

    /// The persisted bytes could not be decoded into a report table
    #[error("could not decode persisted report: {0}")]
    Decode(String),

    /// The report table could not be encoded for upload
    #[error("could not encode report: {0}")]
    Encode(String),
}
