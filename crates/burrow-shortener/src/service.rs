use crate::validator::{DnsResolver, HostResolver, UrlValidator};
use async_trait::async_trait;
use burrow_core::{
    Allocator, Conflict, InsertOutcome, Repository, Resolver, ShortCode, ShortenerError,
    UrlMapping,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use typed_builder::TypedBuilder;

#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many candidate codes to try before giving up on an allocation.
    #[builder(default = 10)]
    pub max_attempts: u32,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Allocates and resolves short codes.
///
/// This service wraps a `Repository`, a `Generator` and a `UrlValidator`:
/// - submitted URLs are validated before anything touches the store
/// - a URL that is already mapped gets its existing code back
/// - new codes are claimed with `insert_if_absent`, retrying on code
///   collisions up to `max_attempts` times
pub struct ShortenerService<R, G, H = DnsResolver> {
    repository: Arc<R>,
    generator: Arc<G>,
    validator: Arc<UrlValidator<H>>,
    settings: ShortenerSettings,
}

impl<R, G, H> Clone for ShortenerService<R, G, H> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            validator: Arc::clone(&self.validator),
            settings: self.settings,
        }
    }
}

impl<R: Repository, G: Generator, H: HostResolver> ShortenerService<R, G, H> {
    pub fn new(
        repository: R,
        generator: G,
        validator: UrlValidator<H>,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            validator: Arc::new(validator),
            settings: ShortenerSettings {
                max_attempts: settings.max_attempts.max(1),
            },
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn settings(&self) -> ShortenerSettings {
        self.settings
    }

    /// Claims a fresh code for `long_url`, which must not be mapped yet.
    async fn claim_code(&self, long_url: &str) -> Result<UrlMapping, ShortenerError> {
        let attempts = self.settings.max_attempts;

        for attempt in 1..=attempts {
            let candidate: ShortCode = self.generator.generate().into();

            match self
                .repository
                .insert_if_absent(UrlMapping::new(candidate, long_url))
                .await?
            {
                InsertOutcome::Inserted(mapping) => {
                    info!(code = %mapping.short_code, attempt, "allocated short code");
                    return Ok(mapping);
                }
                InsertOutcome::AlreadyExists(Conflict::LongUrl(existing)) => {
                    // Another writer mapped the same URL between our lookup and insert.
                    debug!(code = %existing.short_code, "url mapped concurrently, reusing code");
                    return Ok(existing);
                }
                InsertOutcome::AlreadyExists(Conflict::ShortCode(existing)) => {
                    debug!(code = %existing.short_code, attempt, "short code collision");
                }
            }
        }

        warn!(attempts, url = %long_url, "no free short code within attempt budget");
        Err(ShortenerError::AllocationExhausted { attempts })
    }
}

#[async_trait]
impl<R: Repository, G: Generator, H: HostResolver> Allocator for ShortenerService<R, G, H> {
    async fn allocate(&self, long_url: &str) -> Result<UrlMapping, ShortenerError> {
        let long_url = long_url.trim();
        let host = self.validator.validate(long_url).await?;
        trace!(host = %host, "url accepted");

        if let Some(existing) = self.repository.find_by_long_url(long_url).await? {
            debug!(code = %existing.short_code, "url already shortened");
            return Ok(existing);
        }

        self.claim_code(long_url).await
    }
}

#[async_trait]
impl<R: Repository, G: Generator, H: HostResolver> Resolver for ShortenerService<R, G, H> {
    async fn resolve(&self, code: &str) -> Result<String, ShortenerError> {
        let Ok(short_code) = ShortCode::new(code) else {
            trace!(code, "malformed short code");
            return Err(ShortenerError::NotFound(code.to_string()));
        };

        match self.repository.find_by_code(&short_code).await? {
            Some(mapping) => {
                debug!(code = %short_code, url = %mapping.long_url, "resolved short code");
                Ok(mapping.long_url)
            }
            None => {
                trace!(code = %short_code, "short code not found");
                Err(ShortenerError::NotFound(code.to_string()))
            }
        }
    }
}
