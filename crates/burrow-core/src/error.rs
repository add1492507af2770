use thiserror::Error;

/// Errors related to the core types of the URL shortener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

/// Failures of a mapping store.
///
/// Uniqueness conflicts are not errors; they are reported through
/// [`InsertOutcome::AlreadyExists`](crate::InsertOutcome::AlreadyExists).
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Reasons a submitted URL is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidUrlError {
    #[error("url is empty")]
    Empty,
    #[error("url is {length} bytes long; at most {max_length} are accepted")]
    TooLong { length: usize, max_length: usize },
    #[error("url is malformed: {0}")]
    Malformed(String),
    #[error("url scheme must be http or https, got '{0}'")]
    UnsupportedScheme(String),
    #[error("url has no host")]
    MissingHost,
    #[error("host '{0}' does not resolve")]
    Unresolvable(String),
    #[error("resolving host '{0}' timed out")]
    ResolutionTimedOut(String),
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] InvalidUrlError),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("no free short code after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
