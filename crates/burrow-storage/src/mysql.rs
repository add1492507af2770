use async_trait::async_trait;
use burrow_core::repository::{
    Conflict, InsertOutcome, ReadRepository, Repository, Result, UrlMapping,
};
use burrow_core::{ShortCode, StorageError};
use jiff::Timestamp;
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySqlPool, Row};
use tracing::debug;

/// MySQL implementation of the repository contract.
///
/// Uniqueness of both the short code and the long URL is enforced by unique
/// indexes on `url_mappings`, so an insert is a single statement and the
/// database settles races between writers. A unique violation is turned into
/// a typed [`Conflict`] by reading back the row that won.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Query(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn resolve_conflict(&self, mapping: &UrlMapping) -> Result<Conflict> {
        if let Some(existing) = self.find_by_long_url(&mapping.long_url).await? {
            return Ok(Conflict::LongUrl(existing));
        }
        if let Some(existing) = self.find_by_code(&mapping.short_code).await? {
            return Ok(Conflict::ShortCode(existing));
        }
        Err(StorageError::InvalidData(format!(
            "unique violation for short code '{}' but no conflicting row found",
            mapping.short_code
        )))
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn row_to_mapping(row: MySqlRow) -> Result<UrlMapping> {
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(UrlMapping {
        short_code: ShortCode::new(short_code)
            .map_err(|e| StorageError::InvalidData(e.to_string()))?,
        long_url,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn find_by_code(&self, code: &ShortCode) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, created_at
            FROM url_mappings
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>> {
        let row = sqlx::query(
            r#"
            SELECT short_code, long_url, created_at
            FROM url_mappings
            WHERE long_url_hash = UNHEX(SHA2(?, 256))
              AND long_url = ?
            LIMIT 1
            "#,
        )
        .bind(long_url)
        .bind(long_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(row_to_mapping).transpose()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert_if_absent(&self, mapping: UrlMapping) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO url_mappings (short_code, long_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(mapping.short_code.as_str())
        .bind(mapping.long_url.as_str())
        .bind(mapping.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(mapping)),
            Err(err) if is_unique_violation(&err) => {
                debug!(code = %mapping.short_code, "insert hit a unique constraint");
                let conflict = self.resolve_conflict(&mapping).await?;
                Ok(InsertOutcome::AlreadyExists(conflict))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
