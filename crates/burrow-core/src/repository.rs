use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored mapping between a short code and the URL it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlMapping {
    /// The short code assigned to the URL.
    pub short_code: ShortCode,
    /// The URL as submitted.
    pub long_url: String,
    /// When the mapping was created.
    pub created_at: Timestamp,
}

impl UrlMapping {
    /// Creates a mapping stamped with the current time.
    pub fn new(short_code: ShortCode, long_url: impl Into<String>) -> Self {
        Self {
            short_code,
            long_url: long_url.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// The existing record an insert collided with.
#[derive(Debug, Clone, PartialEq)]
pub enum Conflict {
    /// Another URL already owns the short code.
    ShortCode(UrlMapping),
    /// The URL is already mapped, possibly under a different code.
    LongUrl(UrlMapping),
}

/// Outcome of [`Repository::insert_if_absent`].
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The mapping was stored.
    Inserted(UrlMapping),
    /// Nothing was stored because a uniqueness constraint was hit.
    AlreadyExists(Conflict),
}

/// A read-only view of a mapping store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the mapping for a given short code.
    /// Returns `None` if the code does not exist.
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>>;

    /// Retrieves the mapping for a given long URL.
    /// Returns `None` if the URL has not been shortened.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores the mapping unless its short code or long URL is already taken.
    ///
    /// The check and the write happen atomically with respect to both
    /// uniqueness constraints. When both collide, [`Conflict::LongUrl`] is
    /// reported.
    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<InsertOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_is_stamped_at_creation() {
        let before = Timestamp::now();
        let mapping = UrlMapping::new(ShortCode::new_unchecked("a1b2c"), "https://example.com");

        assert!(mapping.created_at >= before);
        assert!(mapping.created_at <= Timestamp::now());
    }

    #[test]
    fn mapping_serializes_code_as_plain_string() {
        let mapping = UrlMapping::new(ShortCode::new_unchecked("a1b2c"), "https://example.com");

        let json = serde_json::to_value(&mapping).unwrap();

        assert_eq!(json["short_code"], "a1b2c");
        assert_eq!(json["long_url"], "https://example.com");
    }
}
