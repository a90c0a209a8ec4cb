//! ctdigest - Congressional Trade Digest
//!
//! A periodic batch job that polls public congressional stock-trade
//! disclosures, filters out trades already notified, emails one digest of
//! the new ones, and records them in a seen-trade store.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use ctdigest::models::{CanonicalTrade, DigestConfig};
//! use ctdigest::reconciler::{Reconciler, RunSummary};
//! use ctdigest::source::{SourceChain, TradeSource};
//! use ctdigest::store::SeenTradeStore;
//! use ctdigest::notify::Notifier;
//! ```

pub use ctdigest_models as models;
pub use ctdigest_notify as notify;
pub use ctdigest_source as source;
pub use ctdigest_store as store;

pub mod reconciler;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ctdigest_models::DigestConfig;
use ctdigest_notify::ConsoleNotifier;
use ctdigest_source::{HttpTradeSource, SourceChain, TradeSource};
use ctdigest_store::NullSeenStore;

use crate::reconciler::Reconciler;

/// Load configuration from a TOML file.
///
/// An absent file degrades to built-in defaults. A file that exists but
/// cannot be read or parsed is a hard error; running with defaults when the
/// operator wrote a config would silently drop their settings.
pub fn load_config(path: &str) -> Result<DigestConfig, anyhow::Error> {
    match std::fs::read_to_string(path) {
        Ok(config_str) => toml::from_str::<DigestConfig>(&config_str)
            .with_context(|| format!("Failed to parse config: {path}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path, "No config file; using defaults");
            Ok(DigestConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read config: {path}")),
    }
}

/// Build a Reconciler from configuration.
///
/// With `dry_run` set, the digest goes to the console and nothing is
/// persisted, regardless of what the config says.
pub fn build_reconciler(config: &DigestConfig, dry_run: bool) -> Result<Reconciler, anyhow::Error> {
    let timeout = Duration::from_secs(config.http_timeout_seconds);

    let sources: Vec<Box<dyn TradeSource>> = config
        .sources
        .iter()
        .map(|s| {
            HttpTradeSource::new(s.name.clone(), s.url.clone(), config.fetch_cap, timeout)
                .map(|source| Box::new(source) as Box<dyn TradeSource>)
                .with_context(|| format!("Failed to build source: {}", s.name))
        })
        .collect::<Result<_, _>>()?;
    let chain = SourceChain::new(sources);
    if chain.is_empty() {
        tracing::warn!("No trade sources configured; every run will report zero trades");
    }

    if dry_run {
        return Ok(Reconciler::new(
            chain,
            Arc::new(NullSeenStore),
            Arc::new(ConsoleNotifier::new(config.notify.digest_max_lines)),
        ));
    }

    let store = ctdigest_store::build_store(&config.store, timeout)
        .context("Failed to build seen-trade store")?;
    let notifier = ctdigest_notify::build_notifier(&config.notify, timeout)
        .context("Failed to build notifier")?;

    Ok(Reconciler::new(chain, Arc::from(store), Arc::from(notifier)))
}
