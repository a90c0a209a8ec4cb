//! Digest text assembly: one human-readable message per run, bullet list
//! truncated at a configured cap so an unusually busy filing day cannot
//! flood the recipient.

use ctdigest_models::CanonicalTrade;

/// Subject line for a digest of `count` new trades.
pub fn digest_subject(count: usize, date: chrono::NaiveDate) -> String {
    let noun = if count == 1 { "trade" } else { "trades" };
    format!("{count} new congressional {noun} - {date}")
}

/// Render the digest body. At most `max_lines` bullet lines; anything past
/// the cap collapses into a single "and N more" summary line.
pub fn digest_body(trades: &[CanonicalTrade], max_lines: usize) -> String {
    let shown = trades.len().min(max_lines);
    let mut lines: Vec<String> = trades[..shown].iter().map(digest_line).collect();

    let hidden = trades.len() - shown;
    if hidden > 0 {
        lines.push(format!("...and {hidden} more"));
    }

    lines.join("\n")
}

fn digest_line(trade: &CanonicalTrade) -> String {
    format!(
        "- {}: {} {} ({}) filed {}",
        trade.person, trade.transaction_type, trade.ticker, trade.amount, trade.filed_date
    )
}
