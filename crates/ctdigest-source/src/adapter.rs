use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SourceError;

/// Object keys under which some feed mirrors wrap their record array.
const WRAPPER_KEYS: &[&str] = &["data", "trades", "transactions"];

/// A source of raw trade records. Mockable for testing.
#[async_trait]
pub trait TradeSource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the most recent raw records, bounded by the configured cap.
    /// Read-only; the only side effect is the outbound request.
    async fn fetch(&self) -> Result<Vec<Value>, SourceError>;
}

/// A trade source backed by an HTTP GET of a JSON document.
pub struct HttpTradeSource {
    name: String,
    url: String,
    cap: usize,
    client: reqwest::Client,
}

impl HttpTradeSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        cap: usize,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ctdigest/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            cap,
            client,
        })
    }
}

#[async_trait]
impl TradeSource for HttpTradeSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        // Decode from text rather than `.json()` so a failure can carry a
        // payload preview (the feeds occasionally serve HTML error pages
        // with a 200 status).
        let body = response.text().await?;
        extract_records(&body, self.cap)
    }
}

/// Parse a payload into a record array, tolerating the wrapper-object
/// variants some mirrors serve. At most `cap` records are kept, in
/// provider order, so one oversized feed cannot blow up a run.
pub fn extract_records(body: &str, cap: usize) -> Result<Vec<Value>, SourceError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| SourceError::parse(format!("invalid JSON: {e}"), body))?;

    let mut records = match parsed {
        Value::Array(records) => records,
        Value::Object(ref obj) => WRAPPER_KEYS
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_array).cloned())
            .ok_or_else(|| SourceError::parse("JSON object without a record array", body))?,
        _ => return Err(SourceError::parse("JSON is not an array of records", body)),
    };
    records.truncate(cap);
    Ok(records)
}
