pub mod error;
pub mod rest;

pub mod test_support;

pub use error::StoreError;
pub use rest::{build_store, NullSeenStore, RestSeenStore, SeenTradeStore};
