use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned status {status}")]
    Status { status: u16 },

    #[error("malformed store response: {0}")]
    Malformed(String),
}
