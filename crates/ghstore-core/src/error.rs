use thiserror::Error;

/// All the ways things can go wrong in ghstore
///
/// The pipeline distinguishes three failure classes and they must not
/// collapse into one: a pagination failure aborts the whole operation,
/// a per-repository release-check failure is absorbed inside the
/// release inspector, and cancellation always propagates.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Host request failed: {0}")]
    Host(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Local store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
