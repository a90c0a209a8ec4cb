//! Mock seen-trade stores for tests in this crate and downstream.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use ctdigest_models::SeenTradeRow;

use crate::error::StoreError;
use crate::rest::SeenTradeStore;

/// In-memory store with scriptable failure modes.
pub struct MockSeenStore {
    seen: Mutex<HashSet<String>>,
    recorded: Mutex<Vec<SeenTradeRow>>,
    exists_fails: bool,
    record_fails: bool,
}

impl MockSeenStore {
    /// A store that already contains the given identities.
    pub fn with_seen(identities: &[&str]) -> Self {
        Self {
            seen: Mutex::new(identities.iter().map(|s| s.to_string()).collect()),
            recorded: Mutex::new(Vec::new()),
            exists_fails: false,
            record_fails: false,
        }
    }

    pub fn empty() -> Self {
        Self::with_seen(&[])
    }

    /// Every existence check errors, as under a store outage.
    pub fn with_failing_exists() -> Self {
        let mut store = Self::empty();
        store.exists_fails = true;
        store
    }

    /// Every persist call errors.
    pub fn with_failing_record() -> Self {
        let mut store = Self::empty();
        store.record_fails = true;
        store
    }

    /// Rows persisted so far, in call order.
    pub fn recorded(&self) -> Vec<SeenTradeRow> {
        self.recorded.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SeenTradeStore for MockSeenStore {
    async fn exists(&self, identity: &str) -> Result<bool, StoreError> {
        if self.exists_fails {
            return Err(StoreError::Status { status: 500 });
        }
        let seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        Ok(seen.contains(identity))
    }

    async fn record(&self, row: &SeenTradeRow) -> Result<(), StoreError> {
        if self.record_fails {
            return Err(StoreError::Status { status: 500 });
        }
        self.recorded
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(row.clone());
        Ok(())
    }
}
