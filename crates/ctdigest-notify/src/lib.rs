pub mod digest;
pub mod email;
pub mod error;

pub mod test_support;

pub use digest::{digest_body, digest_subject};
pub use email::{build_notifier, ConsoleNotifier, EmailNotifier, Notifier};
pub use error::NotifyError;
