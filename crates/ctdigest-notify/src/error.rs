use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("channel returned status {status}: {body}")]
    Status { status: u16, body: String },
}
