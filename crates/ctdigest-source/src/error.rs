use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source returned status {status}")]
    Status { status: u16 },

    #[error("unparseable payload: {reason} (preview: {preview:?})")]
    Parse { reason: String, preview: String },
}

impl SourceError {
    /// Build a parse error carrying a short payload preview for diagnosis.
    /// The preview is what ends up in the run log when a source starts
    /// serving HTML error pages instead of JSON.
    pub fn parse(reason: impl Into<String>, payload: &str) -> Self {
        Self::Parse {
            reason: reason.into(),
            preview: payload.chars().take(120).collect(),
        }
    }
}
