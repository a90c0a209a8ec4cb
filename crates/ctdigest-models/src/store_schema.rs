use serde::{Deserialize, Serialize};

use crate::trade::CanonicalTrade;

/// Wire row for the seen-trade store.
///
/// Written exactly once per identity, after the notify step for the batch
/// containing that identity; never updated or deleted by this system. The
/// store assigns its own processing timestamp on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeenTradeRow {
    /// Trade identity (see `trade_identity`), the primary dedup key.
    pub id: String,
    pub politician: String,
    pub ticker: String,
    pub filed_date: String,
}

impl SeenTradeRow {
    /// Build the store row for a trade, deriving `id` through the same
    /// identity function the filtering path uses.
    pub fn from_trade(trade: &CanonicalTrade) -> Self {
        Self {
            id: trade.identity(),
            politician: trade.person.clone(),
            ticker: trade.ticker.clone(),
            filed_date: trade.filed_date.clone(),
        }
    }
}
