use serde::{Deserialize, Serialize};

/// Placeholder used when a source omits an optional descriptive field.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Separator for the dedup identity key. Never appears in tickers or
/// ISO-ish dates, so the three identity parts stay unambiguous.
pub const IDENTITY_SEPARATOR: char = '|';

/// A disclosed trade, normalized out of whatever shape the source used.
///
/// `person`, `ticker` and `filed_date` are guaranteed non-empty: records
/// missing any of them are dropped during normalization and never reach
/// identity computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalTrade {
    /// Politician name, whichever source field it arrived under.
    pub person: String,
    pub ticker: String,
    /// Buy/sell/exchange descriptor as reported by the source.
    pub transaction_type: String,
    /// Free-text amount range (e.g. "$1,001 - $15,000") or "Unknown".
    pub amount: String,
    /// First non-empty date-like field the source provided (ISO-ish).
    pub filed_date: String,
}

impl CanonicalTrade {
    /// The dedup key for this trade. Delegates to [`trade_identity`] so the
    /// filtering path and the persistence path can never drift apart.
    pub fn identity(&self) -> String {
        trade_identity(&self.filed_date, &self.person, &self.ticker)
    }
}

/// Derive the stable dedup identity for a trade.
///
/// Pure function of (date, person, ticker): two records agreeing on those
/// three fields always map to the same key, regardless of which source
/// produced them or what their other fields say. Source-provided opaque IDs
/// are deliberately not used; they are not stable across provider variants.
pub fn trade_identity(date: &str, person: &str, ticker: &str) -> String {
    let sep = IDENTITY_SEPARATOR;
    format!("{date}{sep}{person}{sep}{ticker}")
}
