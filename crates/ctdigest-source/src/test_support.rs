//! Mock trade sources for tests in this crate and downstream.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::adapter::TradeSource;
use crate::error::SourceError;

/// A trade source returning canned records, an empty batch, or a failure.
pub struct MockSource {
    name: String,
    records: Vec<Value>,
    fail: bool,
    fetch_count: AtomicUsize,
}

impl MockSource {
    pub fn with_records(name: &str, records: Vec<Value>) -> Self {
        Self {
            name: name.to_string(),
            records,
            fail: false,
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn empty(name: &str) -> Self {
        Self::with_records(name, Vec::new())
    }

    pub fn failing(name: &str) -> Self {
        let mut mock = Self::empty(name);
        mock.fail = true;
        mock
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TradeSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SourceError::Status { status: 503 });
        }
        Ok(self.records.clone())
    }
}
