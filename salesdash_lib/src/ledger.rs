//! In-memory ledger holding the working set of sales rows.

use std::sync::{Arc, RwLock};

use crate::row::SaleRow;

/// Storage seam between ingestion and report generation.
///
/// `snapshot` hands out an immutable view: a report built from it never
/// observes a concurrent `put`.
pub trait LedgerStore: Send + Sync {
    /// Replaces the stored rows wholesale.
    fn put(&self, rows: Vec<SaleRow>);

    /// Returns the rows as of the last completed `put`.
    fn snapshot(&self) -> Arc<Vec<SaleRow>>;
}

/// Thread-safe ledger backed by a copy-on-write row vector.
///
/// Writers swap in a new `Arc` under the write lock, so readers holding an
/// earlier snapshot keep it unchanged and writes are serialized.
#[derive(Default)]
pub struct MemoryLedger {
    rows: RwLock<Arc<Vec<SaleRow>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger already holding `rows`.
    pub fn with_rows(rows: Vec<SaleRow>) -> Self {
        Self {
            rows: RwLock::new(Arc::new(rows)),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerStore for MemoryLedger {
    fn put(&self, rows: Vec<SaleRow>) {
        let count = rows.len();
        let mut guard = self.rows.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(rows);
        tracing::debug!(rows = count, "ledger replaced");
    }

    fn snapshot(&self) -> Arc<Vec<SaleRow>> {
        let guard = self.rows.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }
}
