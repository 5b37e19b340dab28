//! Persisted report storage.
//!
//! The report table is wholly owned by a remote blob store; this process
//! only ever holds a transient in-memory copy between one fetch and the
//! write that follows it. The version token returned by `fetch` is the only
//! concurrency-control primitive: it must be obtained fresh for every write
//! and never cached across operations.

pub mod github;
pub mod memory;

pub use github::GithubStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::table::ReportTable;

/// Opaque value proving the writer observed the latest persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wrap a raw token from the store.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Blob-store client for the persisted report.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Read and decode the persisted table with its current version token.
    async fn fetch(&self) -> Result<(ReportTable, VersionToken), StoreError>;

    /// Encode and upload `table`, guarded by `token`.
    ///
    /// Fails with [`StoreError::Conflict`] if the token is stale. The token
    /// is consumed: a retry must start from a fresh `fetch`.
    async fn write(&self, table: &ReportTable, token: VersionToken) -> Result<(), StoreError>;
}
