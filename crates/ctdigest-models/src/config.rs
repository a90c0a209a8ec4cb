use serde::{Deserialize, Serialize};

/// Environment variables recognized at startup. Any subset may be absent;
/// absence selects the graceful-degradation path for that component, never
/// a startup failure.
pub mod env_keys {
    /// Digest recipient address.
    pub const RECIPIENT: &str = "CTDIGEST_RECIPIENT";
    /// API key for the email channel.
    pub const NOTIFIER_KEY: &str = "CTDIGEST_NOTIFIER_KEY";
    /// Base URL of the seen-trade store.
    pub const STORE_URL: &str = "CTDIGEST_STORE_URL";
    /// API key for the seen-trade store.
    pub const STORE_KEY: &str = "CTDIGEST_STORE_KEY";
}

/// Top-level configuration for a digest run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DigestConfig {
    /// Trade sources, tried in order until one yields a usable batch.
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    /// Most-recent entries kept per fetch, as ordered by the provider.
    #[serde(default = "default_fetch_cap")]
    pub fetch_cap: usize,
    /// Network timeout applied to every outbound call, in seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            fetch_cap: default_fetch_cap(),
            http_timeout_seconds: default_http_timeout(),
            notify: NotifyConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// One upstream trade feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Short name used in logs (e.g. "senate").
    pub name: String,
    pub url: String,
}

/// Email channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotifyConfig {
    /// Base URL of the email-sending API.
    #[serde(default = "default_notify_api_url")]
    pub api_url: String,
    #[serde(default = "default_notify_from")]
    pub from: String,
    /// Recipient address. None = console fallback instead of email.
    #[serde(default)]
    pub to: Option<String>,
    /// Channel API key. None = console fallback instead of email.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Maximum bullet lines in one digest before the "and N more" summary.
    #[serde(default = "default_digest_max_lines")]
    pub digest_max_lines: usize,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            api_url: default_notify_api_url(),
            from: default_notify_from(),
            to: None,
            api_key: None,
            digest_max_lines: default_digest_max_lines(),
        }
    }
}

/// Seen-trade store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoreConfig {
    /// Base URL of the REST store. None = store disabled: every fetched
    /// trade is treated as new and nothing is persisted.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl DigestConfig {
    /// Overlay the recognized environment variables onto this config.
    pub fn overlay_env(&mut self) {
        self.overlay_from(|key| std::env::var(key).ok());
    }

    /// Overlay from an arbitrary lookup. Split out so tests can inject
    /// variables without touching process environment.
    pub fn overlay_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(to) = non_empty(lookup(env_keys::RECIPIENT)) {
            self.notify.to = Some(to);
        }
        if let Some(key) = non_empty(lookup(env_keys::NOTIFIER_KEY)) {
            self.notify.api_key = Some(key);
        }
        if let Some(url) = non_empty(lookup(env_keys::STORE_URL)) {
            self.store.url = Some(url);
        }
        if let Some(key) = non_empty(lookup(env_keys::STORE_KEY)) {
            self.store.api_key = Some(key);
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn default_sources() -> Vec<SourceConfig> {
    vec![
        SourceConfig {
            name: "senate".to_string(),
            url: "https://senate-stock-watcher-data.s3-us-west-2.amazonaws.com/aggregate/all_transactions.json".to_string(),
        },
        SourceConfig {
            name: "house".to_string(),
            url: "https://house-stock-watcher-data.s3-us-west-2.amazonaws.com/data/all_transactions.json".to_string(),
        },
    ]
}

fn default_fetch_cap() -> usize {
    15
}
fn default_http_timeout() -> u64 {
    10
}
fn default_notify_api_url() -> String {
    "https://api.resend.com".to_string()
}
fn default_notify_from() -> String {
    "digest@ctdigest.local".to_string()
}
fn default_digest_max_lines() -> usize {
    10
}
