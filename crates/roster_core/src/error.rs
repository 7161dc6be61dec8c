use thiserror::Error;

/// Failure while loading a page or a stats snapshot. Fetch failures are
/// terminal for the view that issued them: the controller stays in its
/// failed state and refuses further automatic fetches.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("view already failed and requires a full reload: {0}")]
    ViewFailed(String),
}

/// Failure while writing a single-field edit. Non-terminal: local state is
/// exactly as it was before the attempted write.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("remote store rejected the write: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Validation(String),
}
