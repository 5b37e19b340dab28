//! In-memory report store for testing and development.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store::{ReportStore, VersionToken};
use crate::table::ReportTable;

/// In-memory [`ReportStore`] with real optimistic-concurrency semantics.
///
/// Every successful write bumps the version, so a caller reusing a token
/// across writes gets the same [`StoreError::Conflict`] the real store
/// produces. Useful for tests; data is lost on drop.
pub struct MemoryStore {
    inner: RwLock<Versioned>,
}

struct Versioned {
    table: ReportTable,
    version: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store at version 0.
    pub fn new() -> Self {
        Self::with_table(ReportTable::new())
    }

    /// Create a store seeded with a table.
    pub fn with_table(table: ReportTable) -> Self {
        Self {
            inner: RwLock::new(Versioned { table, version: 0 }),
        }
    }

    /// Snapshot of the currently persisted table.
    pub fn table(&self) -> ReportTable {
        self.inner.read().unwrap().table.clone()
    }

    /// Number of successful writes so far.
    pub fn version(&self) -> u64 {
        self.inner.read().unwrap().version
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn fetch(&self) -> Result<(ReportTable, VersionToken), StoreError> {
        let inner = self.inner.read().unwrap();
        Ok((
            inner.table.clone(),
            VersionToken::new(inner.version.to_string()),
        ))
    }

    async fn write(&self, table: &ReportTable, token: VersionToken) -> Result<(), StoreError> {
        let mut inner = self.inner.write().unwrap();
        if token.as_str() != inner.version.to_string() {
            return Err(StoreError::Conflict);
        }
        inner.table = table.clone();
        inner.version += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionKey;
    use crate::table::ReportRow;

    fn one_row_table() -> ReportTable {
        let mut table = ReportTable::new();
        table.push(ReportRow::new("A").with_answer(QuestionKey::MembershipCount, "10"));
        table
    }

    #[tokio::test]
    async fn test_fetch_then_write_succeeds() {
        let store = MemoryStore::new();
        let (table, token) = store.fetch().await.unwrap();
        assert!(table.is_empty());

        store.write(&one_row_table(), token).await.unwrap();
        assert_eq!(store.table().len(), 1);
        assert_eq!(store.version(), 1);
    }

    #[tokio::test]
    async fn test_stale_token_conflicts() {
        let store = MemoryStore::new();
        let (_, stale) = store.fetch().await.unwrap();

        // Another writer gets in first.
        let (_, token) = store.fetch().await.unwrap();
        store.write(&one_row_table(), token).await.unwrap();

        let err = store.write(&ReportTable::new(), stale).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
        // The first write is not clobbered.
        assert_eq!(store.table().len(), 1);
    }

    #[tokio::test]
    async fn test_token_cannot_be_reused() {
        let store = MemoryStore::new();
        let (_, token) = store.fetch().await.unwrap();
        store.write(&one_row_table(), token.clone()).await.unwrap();

        let err = store.write(&one_row_table(), token).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }
}
