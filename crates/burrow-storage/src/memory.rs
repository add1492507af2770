use async_trait::async_trait;
use burrow_core::repository::{
    Conflict, InsertOutcome, ReadRepository, Repository, Result, UrlMapping,
};
use burrow_core::ShortCode;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Index {
    by_code: HashMap<ShortCode, UrlMapping>,
    by_url: HashMap<String, ShortCode>,
}

impl Index {
    fn mapping_for_url(&self, long_url: &str) -> Option<&UrlMapping> {
        self.by_url
            .get(long_url)
            .and_then(|code| self.by_code.get(code))
    }
}

/// In-memory implementation of the Repository trait.
///
/// Both indexes live behind one lock so `insert_if_absent` checks the short
/// code and the long URL in the same critical section. Reads take the shared
/// lock and never block each other.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    index: RwLock<Index>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: RwLock::new(Index {
                by_code: HashMap::with_capacity(capacity),
                by_url: HashMap::with_capacity(capacity),
            }),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.index.read().by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        Ok(self.index.read().by_code.get(code).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        Ok(self.index.read().mapping_for_url(long_url).cloned())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<InsertOutcome> {
        let mut index = self.index.write();

        if let Some(existing) = index.mapping_for_url(&mapping.long_url) {
            return Ok(InsertOutcome::AlreadyExists(Conflict::LongUrl(
                existing.clone(),
            )));
        }

        if let Some(existing) = index.by_code.get(&mapping.short_code) {
            return Ok(InsertOutcome::AlreadyExists(Conflict::ShortCode(
                existing.clone(),
            )));
        }

        index
            .by_url
            .insert(mapping.long_url.clone(), mapping.short_code.clone());
        index
            .by_code
            .insert(mapping.short_code.clone(), mapping.clone());

        Ok(InsertOutcome::Inserted(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn mapping(c: &str, url: &str) -> UrlMapping {
        UrlMapping::new(code(c), url)
    }

    #[tokio::test]
    async fn insert_and_find() {
        let repo = InMemoryRepository::new();

        let outcome = repo
            .insert_if_absent(mapping("abc12", "https://example.com"))
            .await
            .unwrap();
        assert!(matches!(outcome, InsertOutcome::Inserted(_)));

        let by_code = repo.find_by_code(&code("abc12")).await.unwrap().unwrap();
        assert_eq!(by_code.long_url, "https://example.com");

        let by_url = repo
            .find_by_long_url("https://example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_url.short_code, code("abc12"));
    }

    #[tokio::test]
    async fn find_nonexistent() {
        let repo = InMemoryRepository::new();

        assert!(repo.find_by_code(&code("nope1")).await.unwrap().is_none());
        assert!(repo
            .find_by_long_url("https://nowhere.example")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn code_conflict_reports_existing_record() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(mapping("abc12", "https://one.example"))
            .await
            .unwrap();

        let outcome = repo
            .insert_if_absent(mapping("abc12", "https://two.example"))
            .await
            .unwrap();

        match outcome {
            InsertOutcome::AlreadyExists(Conflict::ShortCode(existing)) => {
                assert_eq!(existing.long_url, "https://one.example");
            }
            other => panic!("expected short code conflict, got {other:?}"),
        }
        assert!(repo
            .find_by_long_url("https://two.example")
            .await
            .unwrap()
            .is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn url_conflict_reports_existing_record() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(mapping("abc12", "https://example.com"))
            .await
            .unwrap();

        let outcome = repo
            .insert_if_absent(mapping("xyz89", "https://example.com"))
            .await
            .unwrap();

        match outcome {
            InsertOutcome::AlreadyExists(Conflict::LongUrl(existing)) => {
                assert_eq!(existing.short_code, code("abc12"));
            }
            other => panic!("expected long url conflict, got {other:?}"),
        }
        assert!(repo.find_by_code(&code("xyz89")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn url_conflict_wins_when_both_collide() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(mapping("abc12", "https://example.com"))
            .await
            .unwrap();

        let outcome = repo
            .insert_if_absent(mapping("abc12", "https://example.com"))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            InsertOutcome::AlreadyExists(Conflict::LongUrl(_))
        ));
    }

    #[tokio::test]
    async fn long_urls_are_matched_exactly() {
        let repo = InMemoryRepository::new();
        repo.insert_if_absent(mapping("abc12", "https://example.com/page"))
            .await
            .unwrap();

        assert!(repo
            .find_by_long_url("https://example.com/page/")
            .await
            .unwrap()
            .is_none());
        assert!(repo
            .find_by_long_url("https://EXAMPLE.com/page")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_url_store_one_record() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..32u32 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                let candidate = UrlMapping::new(
                    ShortCode::new_unchecked(format!("c{:04}", i)),
                    "https://example.com/contended",
                );
                repo.insert_if_absent(candidate).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if let InsertOutcome::Inserted(_) = handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_distinct_urls() {
        let repo = Arc::new(InMemoryRepository::with_capacity(16));
        let mut handles = vec![];

        for i in 0..16u32 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_if_absent(UrlMapping::new(
                    ShortCode::new_unchecked(format!("c{:04}", i)),
                    format!("https://example{}.com", i),
                ))
                .await
                .unwrap()
            }));
        }

        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                InsertOutcome::Inserted(_)
            ));
        }

        for i in 0..16u32 {
            let c = ShortCode::new_unchecked(format!("c{:04}", i));
            let found = repo.find_by_code(&c).await.unwrap().unwrap();
            assert_eq!(found.long_url, format!("https://example{}.com", i));
        }
    }
}
