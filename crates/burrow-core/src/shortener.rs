use crate::repository::UrlMapping;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Allocator: Send + Sync + 'static {
    /// Returns the mapping for `long_url`, creating one with a fresh short code
    /// if the URL has not been shortened before.
    async fn allocate(&self, long_url: &str) -> Result<UrlMapping>;
}

#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    /// Resolves a short code to the URL it was allocated for.
    /// Unknown or malformed codes yield `ShortenerError::NotFound`.
    async fn resolve(&self, code: &str) -> Result<String>;
}
