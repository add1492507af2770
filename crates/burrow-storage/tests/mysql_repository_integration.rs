//! Runs against a throwaway MySQL container; needs a container runtime.
//! `cargo test -p burrow-storage -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use burrow_core::ShortCode;
use burrow_storage::{
    Conflict, InsertOutcome, MySqlRepository, ReadRepository, Repository, UrlMapping,
};
use burrow_test_infra::mysql::MySqlServer;
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    _mysql: MySqlServer,
    repo: MySqlRepository,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::start()
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let repo = MySqlRepository::new(pool);
        repo.migrate().await.expect("create schema");

        Self {
            _mysql: mysql,
            repo,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(8)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn mapping(code: &str, url: &str) -> UrlMapping {
    UrlMapping::new(ShortCode::new_unchecked(code), url)
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn insert_and_find_both_ways() {
    let fixture = Fixture::start().await;

    let outcome = fixture
        .repo
        .insert_if_absent(mapping("abc12", "https://example.com/page"))
        .await
        .unwrap();
    assert!(matches!(outcome, InsertOutcome::Inserted(_)));

    let by_code = fixture
        .repo
        .find_by_code(&ShortCode::new_unchecked("abc12"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_code.long_url, "https://example.com/page");

    let by_url = fixture
        .repo
        .find_by_long_url("https://example.com/page")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_url.short_code.as_str(), "abc12");
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn code_conflict_is_reported_with_existing_row() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert_if_absent(mapping("abc12", "https://one.example"))
        .await
        .unwrap();

    let outcome = fixture
        .repo
        .insert_if_absent(mapping("abc12", "https://two.example"))
        .await
        .unwrap();

    match outcome {
        InsertOutcome::AlreadyExists(Conflict::ShortCode(existing)) => {
            assert_eq!(existing.long_url, "https://one.example");
        }
        other => panic!("expected short code conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn url_conflict_is_reported_with_existing_row() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert_if_absent(mapping("abc12", "https://example.com"))
        .await
        .unwrap();

    let outcome = fixture
        .repo
        .insert_if_absent(mapping("xyz89", "https://example.com"))
        .await
        .unwrap();

    match outcome {
        InsertOutcome::AlreadyExists(Conflict::LongUrl(existing)) => {
            assert_eq!(existing.short_code.as_str(), "abc12");
        }
        other => panic!("expected long url conflict, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn long_urls_beyond_index_width_stay_unique() {
    let fixture = Fixture::start().await;
    let long = format!("https://example.com/{}", "a".repeat(4000));

    fixture
        .repo
        .insert_if_absent(mapping("long1", &long))
        .await
        .unwrap();
    let outcome = fixture
        .repo
        .insert_if_absent(mapping("long2", &long))
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        InsertOutcome::AlreadyExists(Conflict::LongUrl(_))
    ));
}

#[tokio::test]
#[ignore = "requires a container runtime"]
async fn concurrent_inserts_of_same_url_store_one_row() {
    let fixture = Fixture::start().await;
    let repo = Arc::new(fixture.repo.clone());
    let mut handles = vec![];

    for i in 0..8u32 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert_if_absent(mapping(&format!("c{:04}", i), "https://example.com/race"))
                .await
                .unwrap()
        }));
    }

    let mut inserted = 0;
    for handle in handles {
        if let InsertOutcome::Inserted(_) = handle.await.unwrap() {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);

    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM url_mappings")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
