use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapter::TradeSource;

/// An ordered fallback chain of trade sources.
///
/// The first source that yields a non-empty, well-formed batch wins. Fetch
/// failures and empty batches both advance the chain; exhausting every
/// source yields an empty batch, never an error, so a dead upstream costs
/// one quiet run rather than a crash loop.
pub struct SourceChain {
    sources: Vec<Box<dyn TradeSource>>,
}

impl SourceChain {
    pub fn new(sources: Vec<Box<dyn TradeSource>>) -> Self {
        Self { sources }
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Fetch candidate records from the first usable source.
    pub async fn fetch_candidates(&self) -> Vec<Value> {
        for source in &self.sources {
            match source.fetch().await {
                Ok(records) if !records.is_empty() => {
                    info!(
                        source = source.name(),
                        count = records.len(),
                        "Fetched candidate records"
                    );
                    return records;
                }
                Ok(_) => {
                    debug!(source = source.name(), "Source returned no records");
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Source fetch failed");
                }
            }
        }

        info!("All sources exhausted with no records");
        Vec::new()
    }
}
