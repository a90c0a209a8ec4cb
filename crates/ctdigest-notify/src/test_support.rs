//! Mock notifiers for tests in this crate and downstream.

use std::sync::Mutex;

use async_trait::async_trait;
use ctdigest_models::CanonicalTrade;

use crate::email::Notifier;
use crate::error::NotifyError;

/// Captures every batch it is asked to deliver; optionally fails each call.
pub struct MockNotifier {
    batches: Mutex<Vec<Vec<CanonicalTrade>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        let mut mock = Self::new();
        mock.fail = true;
        mock
    }

    pub fn batches(&self) -> Vec<Vec<CanonicalTrade>> {
        self.batches.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.batches.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, batch: &[CanonicalTrade]) -> Result<(), NotifyError> {
        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(batch.to_vec());
        if self.fail {
            return Err(NotifyError::Status {
                status: 429,
                body: "rate limited".to_string(),
            });
        }
        Ok(())
    }
}
