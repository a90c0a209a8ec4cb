use std::sync::Arc;

use ctdigest_models::{CanonicalTrade, SeenTradeRow};
use ctdigest_notify::Notifier;
use ctdigest_source::{normalize_batch, SourceChain};
use ctdigest_store::SeenTradeStore;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Counters for one digest run, logged and printed at the end.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RunSummary {
    /// Raw records obtained from the winning source.
    pub fetched: usize,
    /// Records surviving normalization.
    pub eligible: usize,
    /// Records not found in the seen-trade store.
    pub new: usize,
    /// Whether the digest was accepted by the notification channel.
    pub notified: bool,
    /// Seen-trade rows successfully persisted.
    pub persisted: usize,
    pub persist_failures: usize,
}

/// The dedup reconciler: fetch, normalize, filter by the seen-trade store,
/// notify once, then persist.
///
/// Every boundary failure has a documented fallback (fallback chain, treat
/// errored existence checks as unseen, best-effort persistence), so a run
/// only aborts on errors none of those policies cover.
pub struct Reconciler {
    chain: SourceChain,
    store: Arc<dyn SeenTradeStore>,
    notifier: Arc<dyn Notifier>,
}

impl Reconciler {
    pub fn new(
        chain: SourceChain,
        store: Arc<dyn SeenTradeStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            chain,
            store,
            notifier,
        }
    }

    /// Execute one run, strictly sequentially.
    pub async fn run(&self) -> RunSummary {
        let mut summary = RunSummary::default();

        // 1. Fetch through the fallback chain. An exhausted chain is a
        // quiet zero-trade run, not an error.
        let raw = self.chain.fetch_candidates().await;
        summary.fetched = raw.len();

        // 2-3. Normalize; ineligible records are dropped before identity
        // computation.
        let trades = normalize_batch(&raw);
        summary.eligible = trades.len();

        // 4. Sequential existence filter, in fetch order. A store error
        // keeps the record in the new set: over-notifying beats silently
        // dropping a real trade.
        let new_trades = self.filter_unseen(trades).await;
        summary.new = new_trades.len();

        // 5. Nothing new: no notification attempt, no persistence attempt.
        if new_trades.is_empty() {
            info!(
                fetched = summary.fetched,
                eligible = summary.eligible,
                "No new trades this run"
            );
            return summary;
        }

        // 6. One digest for the whole batch, never one message per trade.
        summary.notified = match self.notifier.notify(&new_trades).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, count = new_trades.len(),
                    "Digest delivery failed; batch will still be marked seen");
                false
            }
        };

        // 7. Persist every new trade regardless of the notifier outcome.
        // A persist failure only risks a duplicate digest next run.
        for trade in &new_trades {
            let row = SeenTradeRow::from_trade(trade);
            match self.store.record(&row).await {
                Ok(()) => summary.persisted += 1,
                Err(e) => {
                    warn!(id = %row.id, error = %e, "Failed to persist seen trade");
                    summary.persist_failures += 1;
                }
            }
        }

        info!(
            fetched = summary.fetched,
            eligible = summary.eligible,
            new = summary.new,
            notified = summary.notified,
            persisted = summary.persisted,
            persist_failures = summary.persist_failures,
            "Run complete"
        );
        summary
    }

    async fn filter_unseen(&self, trades: Vec<CanonicalTrade>) -> Vec<CanonicalTrade> {
        let mut new_trades = Vec::new();
        for trade in trades {
            let identity = trade.identity();
            match self.store.exists(&identity).await {
                Ok(true) => {
                    debug!(%identity, "Already notified; skipping");
                }
                Ok(false) => new_trades.push(trade),
                Err(e) => {
                    warn!(%identity, error = %e, "Existence check failed; treating as new");
                    new_trades.push(trade);
                }
            }
        }
        new_trades
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctdigest_notify::test_support::MockNotifier;
    use ctdigest_source::test_support::MockSource;
    use ctdigest_store::test_support::MockSeenStore;
    use serde_json::json;

    fn raw_record(person: &str, ticker: &str, date: &str) -> serde_json::Value {
        json!({
            "senator": person,
            "ticker": ticker,
            "type": "Purchase",
            "amount": "$1,001 - $15,000",
            "transaction_date": date,
        })
    }

    fn reconciler_with(
        records: Vec<serde_json::Value>,
        store: Arc<MockSeenStore>,
        notifier: Arc<MockNotifier>,
    ) -> Reconciler {
        let chain = SourceChain::new(vec![Box::new(MockSource::with_records("senate", records))]);
        Reconciler::new(chain, store, notifier)
    }

    #[tokio::test]
    async fn seen_trades_are_filtered_out() {
        let store = Arc::new(MockSeenStore::with_seen(&[
            "2026-08-18|Jane Senator|AAPL",
        ]));
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![
                raw_record("Jane Senator", "AAPL", "2026-08-18"),
                raw_record("Jane Senator", "MSFT", "2026-08-18"),
            ],
            store.clone(),
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert_eq!(summary.eligible, 2);
        assert_eq!(summary.new, 1);
        assert_eq!(notifier.batches()[0][0].ticker, "MSFT");
        assert_eq!(store.recorded().len(), 1);
    }

    #[tokio::test]
    async fn store_error_treats_record_as_new() {
        let store = Arc::new(MockSeenStore::with_failing_exists());
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![raw_record("Jane Senator", "AAPL", "2026-08-18")],
            store,
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert_eq!(summary.new, 1);
        assert_eq!(notifier.call_count(), 1);
    }

    #[tokio::test]
    async fn notifier_failure_does_not_block_persistence() {
        let store = Arc::new(MockSeenStore::empty());
        let notifier = Arc::new(MockNotifier::failing());
        let reconciler = reconciler_with(
            vec![
                raw_record("Jane Senator", "AAPL", "2026-08-18"),
                raw_record("John Representative", "MSFT", "2026-08-19"),
            ],
            store.clone(),
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert!(!summary.notified);
        assert_eq!(notifier.call_count(), 1);
        // Persist still attempted for every batch member.
        assert_eq!(summary.persisted, 2);
        assert_eq!(store.recorded().len(), 2);
    }

    #[tokio::test]
    async fn persist_failure_is_best_effort() {
        let store = Arc::new(MockSeenStore::with_failing_record());
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![raw_record("Jane Senator", "AAPL", "2026-08-18")],
            store,
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert!(summary.notified);
        assert_eq!(summary.persisted, 0);
        assert_eq!(summary.persist_failures, 1);
    }

    #[tokio::test]
    async fn empty_new_set_skips_notify_and_persist() {
        let store = Arc::new(MockSeenStore::with_seen(&[
            "2026-08-18|Jane Senator|AAPL",
        ]));
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![raw_record("Jane Senator", "AAPL", "2026-08-18")],
            store.clone(),
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert_eq!(summary.new, 0);
        assert_eq!(notifier.call_count(), 0);
        assert!(store.recorded().is_empty());
    }

    #[tokio::test]
    async fn ineligible_records_never_reach_the_store() {
        let store = Arc::new(MockSeenStore::empty());
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![
                raw_record("Jane Senator", "AAPL", "2026-08-18"),
                json!({"ticker": "MSFT", "transaction_date": "2026-08-18"}),
                json!({"senator": "No Date", "ticker": "NVDA"}),
            ],
            store.clone(),
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert_eq!(summary.fetched, 3);
        assert_eq!(summary.eligible, 1);
        assert_eq!(notifier.batches()[0].len(), 1);
        assert_eq!(store.recorded().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_identities_in_one_batch_notify_once_each() {
        // Same (date, person, ticker) twice in a single fetch. Both pass
        // the unseen filter (the store has neither) and both are in the
        // digest; the store's append is idempotent per identity.
        let store = Arc::new(MockSeenStore::empty());
        let notifier = Arc::new(MockNotifier::new());
        let reconciler = reconciler_with(
            vec![
                raw_record("Jane Senator", "AAPL", "2026-08-18"),
                raw_record("Jane Senator", "AAPL", "2026-08-18"),
            ],
            store.clone(),
            notifier.clone(),
        );

        let summary = reconciler.run().await;
        assert_eq!(summary.new, 2);
        let recorded = store.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].id, recorded[1].id);
    }
}
