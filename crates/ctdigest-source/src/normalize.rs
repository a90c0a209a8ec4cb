//! Normalization of raw source records into [`CanonicalTrade`].
//!
//! The upstream feeds do not share a schema: the Senate feed reports the
//! filer under `senator`, the House feed under `representative`, and other
//! mirrors use `politician` or plain `name`. Rather than scattering
//! conditional field access through the adapter, each canonical field has an
//! ordered list of candidate source fields tried in priority order (most
//! specific first). The first non-empty hit wins.

use ctdigest_models::trade::{CanonicalTrade, UNKNOWN_FIELD};
use serde_json::Value;

/// Candidate source fields per canonical field, most specific first.
const PERSON_FIELDS: &[&str] = &["senator", "representative", "politician", "name"];
const TICKER_FIELDS: &[&str] = &["ticker", "symbol"];
const TYPE_FIELDS: &[&str] = &["type", "transaction_type"];
const AMOUNT_FIELDS: &[&str] = &["amount", "amount_range"];

/// Date-like fields, transaction date preferred over disclosure date.
const DATE_FIELDS: &[&str] = &["transaction_date", "disclosure_date", "filed_date", "date"];

/// Ticker placeholders the feeds use for non-stock assets.
const TICKER_PLACEHOLDERS: &[&str] = &["--", "N/A"];

/// Normalize one raw record. Returns None for ineligible records: anything
/// missing a person, a real ticker, or every date-like field is silently
/// dropped before identity computation.
pub fn normalize(raw: &Value) -> Option<CanonicalTrade> {
    let person = first_non_empty(raw, PERSON_FIELDS)?;
    let ticker = first_non_empty(raw, TICKER_FIELDS)
        .filter(|t| !TICKER_PLACEHOLDERS.contains(&t.as_str()))?;
    // No date-like field at all means no stable identity is possible; drop
    // the record rather than assign a partial key.
    let filed_date = first_non_empty(raw, DATE_FIELDS)?;

    let transaction_type =
        first_non_empty(raw, TYPE_FIELDS).unwrap_or_else(|| UNKNOWN_FIELD.to_string());
    let amount = first_non_empty(raw, AMOUNT_FIELDS).unwrap_or_else(|| UNKNOWN_FIELD.to_string());

    Some(CanonicalTrade {
        person,
        ticker,
        transaction_type,
        amount,
        filed_date,
    })
}

/// Normalize a whole batch, preserving fetch order and dropping ineligible
/// records.
pub fn normalize_batch(raw: &[Value]) -> Vec<CanonicalTrade> {
    let trades: Vec<CanonicalTrade> = raw.iter().filter_map(normalize).collect();
    let dropped = raw.len() - trades.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped ineligible records during normalization");
    }
    trades
}

fn first_non_empty(raw: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| {
        raw.get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
