use std::time::Duration;

use async_trait::async_trait;
use ctdigest_models::{SeenTradeRow, StoreConfig};
use serde_json::Value;
use tracing::info;

use crate::error::StoreError;

/// Persisted set of already-notified trade identities.
///
/// The implementation is best-effort infrastructure: the caller decides how
/// to degrade when a call fails (treat errored existence checks as unseen,
/// log and skip failed writes), so both methods surface errors verbatim.
#[async_trait]
pub trait SeenTradeStore: Send + Sync {
    /// Whether this identity has already been notified.
    async fn exists(&self, identity: &str) -> Result<bool, StoreError>;

    /// Append one seen-trade row. Append-only and idempotent per identity;
    /// rows are never updated or deleted by this system.
    async fn record(&self, row: &SeenTradeRow) -> Result<(), StoreError>;
}

/// PostgREST-style REST client for the seen-trade table.
pub struct RestSeenStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

const TABLE: &str = "seen_trades";

impl RestSeenStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ctdigest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{TABLE}", self.base_url)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request
                .header("apikey", key)
                .bearer_auth(key),
            None => request,
        }
    }

    /// `GET <base>/seen_trades?id=eq.<identity>` with auth headers applied.
    fn exists_request(&self, identity: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(self.table_url())
            .query(&[("id", format!("eq.{identity}"))]);
        self.authed(request)
    }

    /// `POST <base>/seen_trades` with the row as JSON, auth headers applied.
    fn record_request(&self, row: &SeenTradeRow) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(self.table_url())
            .header("Prefer", "return=minimal")
            .json(row);
        self.authed(request)
    }
}

#[async_trait]
impl SeenTradeStore for RestSeenStore {
    async fn exists(&self, identity: &str) -> Result<bool, StoreError> {
        let response = self.exists_request(identity).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }

        // Empty array means unseen.
        let rows: Value = response.json().await?;
        match rows.as_array() {
            Some(array) => Ok(!array.is_empty()),
            None => Err(StoreError::Malformed(format!(
                "expected a JSON array, got: {rows}"
            ))),
        }
    }

    async fn record(&self, row: &SeenTradeRow) -> Result<(), StoreError> {
        let response = self.record_request(row).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Stand-in when no store is configured: everything is unseen and nothing
/// is persisted, so the job degrades to "notify every fetched trade every
/// run" instead of refusing to operate.
pub struct NullSeenStore;

#[async_trait]
impl SeenTradeStore for NullSeenStore {
    async fn exists(&self, _identity: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn record(&self, _row: &SeenTradeRow) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Build a store from config, falling back to [`NullSeenStore`] when no URL
/// is configured.
pub fn build_store(
    config: &StoreConfig,
    timeout: Duration,
) -> Result<Box<dyn SeenTradeStore>, StoreError> {
    match &config.url {
        Some(url) => {
            let store = RestSeenStore::new(url.clone(), config.api_key.clone(), timeout)?;
            Ok(Box::new(store))
        }
        None => {
            info!("Seen-trade store unconfigured; every fetched trade will be treated as new");
            Ok(Box::new(NullSeenStore))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> SeenTradeRow {
        SeenTradeRow {
            id: "2026-08-18|Jane Senator|AAPL".to_string(),
            politician: "Jane Senator".to_string(),
            ticker: "AAPL".to_string(),
            filed_date: "2026-08-18".to_string(),
        }
    }

    #[test]
    fn table_url_strips_trailing_slash() {
        let store =
            RestSeenStore::new("https://db.example.test/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(store.table_url(), "https://db.example.test/seen_trades");
    }

    #[test]
    fn exists_request_filters_on_identity() {
        let store =
            RestSeenStore::new("https://db.example.test", None, Duration::from_secs(5)).unwrap();
        let request = store
            .exists_request("2026-08-18|Jane Senator|AAPL")
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/seen_trades");

        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![(
                "id".to_string(),
                "eq.2026-08-18|Jane Senator|AAPL".to_string()
            )]
        );
        // The separator must be percent-encoded on the wire.
        assert!(request.url().query().unwrap().contains("%7C"));
    }

    #[test]
    fn keyed_requests_carry_apikey_and_bearer_headers() {
        let store = RestSeenStore::new(
            "https://db.example.test",
            Some("store-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let request = store.exists_request("x").build().unwrap();

        assert_eq!(request.headers().get("apikey").unwrap(), "store-key");
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer store-key"
        );
    }

    #[test]
    fn keyless_requests_carry_no_auth_headers() {
        let store =
            RestSeenStore::new("https://db.example.test", None, Duration::from_secs(5)).unwrap();
        let request = store.exists_request("x").build().unwrap();

        assert!(request.headers().get("apikey").is_none());
        assert!(request.headers().get("authorization").is_none());
    }

    #[test]
    fn record_request_posts_row_with_minimal_return() {
        let store = RestSeenStore::new(
            "https://db.example.test",
            Some("store-key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        let request = store.record_request(&sample_row()).build().unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().path(), "/seen_trades");
        assert_eq!(request.headers().get("Prefer").unwrap(), "return=minimal");
        assert_eq!(request.headers().get("apikey").unwrap(), "store-key");

        let body = request.body().unwrap().as_bytes().unwrap();
        let sent: Value = serde_json::from_slice(body).unwrap();
        assert_eq!(sent["id"], "2026-08-18|Jane Senator|AAPL");
        assert_eq!(sent["politician"], "Jane Senator");
        assert_eq!(sent["ticker"], "AAPL");
    }

    #[tokio::test]
    async fn null_store_reports_everything_unseen() {
        let store = NullSeenStore;
        assert!(!store.exists("2026-08-18|Jane Senator|AAPL").await.unwrap());
    }

    #[tokio::test]
    async fn null_store_record_is_noop() {
        let store = NullSeenStore;
        let row = SeenTradeRow {
            id: "2026-08-18|Jane Senator|AAPL".to_string(),
            politician: "Jane Senator".to_string(),
            ticker: "AAPL".to_string(),
            filed_date: "2026-08-18".to_string(),
        };
        store.record(&row).await.unwrap();
    }

    #[test]
    fn unconfigured_store_builds_null() {
        let config = StoreConfig::default();
        // Just verify construction succeeds without a URL.
        build_store(&config, Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn configured_store_builds_rest() {
        let config = StoreConfig {
            url: Some("https://db.example.test".to_string()),
            api_key: Some("store-key".to_string()),
        };
        build_store(&config, Duration::from_secs(5)).unwrap();
    }
}
