pub mod adapter;
pub mod chain;
pub mod error;
pub mod normalize;

pub mod test_support;

pub use adapter::{HttpTradeSource, TradeSource};
pub use chain::SourceChain;
pub use error::SourceError;
pub use normalize::{normalize, normalize_batch};
