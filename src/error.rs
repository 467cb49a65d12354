use thiserror::Error;

/// Failures that can occur while handling a single request.
///
/// None of these end the process. Validation and upstream fetch failures
/// are rendered as a warning on an otherwise successful page, the
/// authorization failures become client-error responses and render
/// failures fall back to a minimal built-in body.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Too many requests")]
    RateLimited,

    #[error("That did not look like a valid playlist or album reference")]
    InvalidReference { input: String },

    #[error("Authorization state mismatch")]
    AuthStateMismatch,

    #[error("Couldn't get token: {0}")]
    TokenExchangeFailed(String),

    #[error("{0}")]
    UpstreamFetchFailed(String),

    #[error("Failed to render {view}: {reason}")]
    RenderFailed { view: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for failures that are shown inline on the search page rather
    /// than answered with an error status.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Error::InvalidReference { .. } | Error::UpstreamFetchFailed(_)
        )
    }
}
