pub mod config;
pub mod store_schema;
pub mod trade;

pub use config::{DigestConfig, NotifyConfig, SourceConfig, StoreConfig};
pub use store_schema::SeenTradeRow;
pub use trade::{trade_identity, CanonicalTrade};
