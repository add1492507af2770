use async_trait::async_trait;
use burrow_core::InvalidUrlError;
use std::collections::HashSet;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;
use url::Url;

/// Longest URL accepted, in bytes. Every store keeps at least this much.
pub const MAX_URL_LENGTH: usize = 8192;

/// The host part of an accepted URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    name: String,
    port: u16,
}

impl Host {
    pub fn new(name: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            port,
        }
    }

    /// Host name or IP literal, without brackets or port.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit port, or the scheme's default.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}

/// Answers whether a host name resolves to at least one address.
#[async_trait]
pub trait HostResolver: Send + Sync + 'static {
    async fn resolves(&self, host: &Host) -> bool;
}

/// Resolves hosts through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DnsResolver;

#[async_trait]
impl HostResolver for DnsResolver {
    async fn resolves(&self, host: &Host) -> bool {
        match tokio::net::lookup_host((host.name(), host.port())).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                debug!(host = %host, error = %e, "host lookup failed");
                false
            }
        }
    }
}

/// Resolves only a fixed set of host names. Intended for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    known: HashSet<String>,
}

impl StaticResolver {
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            known: hosts
                .into_iter()
                .map(|h| h.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }
}

#[async_trait]
impl HostResolver for StaticResolver {
    async fn resolves(&self, host: &Host) -> bool {
        self.known.contains(&host.name().to_ascii_lowercase())
    }
}

#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ValidatorSettings {
    /// Upper bound on a single host lookup.
    #[builder(default = Duration::from_secs(5))]
    pub resolve_timeout: Duration,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Accepts absolute `http`/`https` URLs whose host resolves.
#[derive(Debug, Clone)]
pub struct UrlValidator<H> {
    resolver: H,
    settings: ValidatorSettings,
}

impl UrlValidator<DnsResolver> {
    /// Creates a validator backed by the system resolver.
    pub fn dns(settings: ValidatorSettings) -> Self {
        Self::new(DnsResolver, settings)
    }
}

impl<H: HostResolver> UrlValidator<H> {
    pub fn new(resolver: H, settings: ValidatorSettings) -> Self {
        Self { resolver, settings }
    }

    /// Checks the syntax of `input` and extracts its host. Performs no I/O.
    pub fn parse(input: &str) -> Result<Host, InvalidUrlError> {
        if input.is_empty() {
            return Err(InvalidUrlError::Empty);
        }
        if input.len() > MAX_URL_LENGTH {
            return Err(InvalidUrlError::TooLong {
                length: input.len(),
                max_length: MAX_URL_LENGTH,
            });
        }

        let url = Url::parse(input).map_err(|e| match e {
            url::ParseError::EmptyHost => InvalidUrlError::MissingHost,
            other => InvalidUrlError::Malformed(other.to_string()),
        })?;

        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(InvalidUrlError::UnsupportedScheme(scheme.to_string()));
        }

        // The parser tolerates "http:host" and "http:/host"; insist on "://".
        let has_authority = input
            .get(scheme.len()..scheme.len() + 3)
            .is_some_and(|sep| sep == "://");
        if !has_authority {
            return Err(InvalidUrlError::Malformed(format!(
                "expected '{scheme}://' prefix"
            )));
        }

        let name = match url.host() {
            Some(url::Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(url::Host::Ipv4(ip)) => ip.to_string(),
            Some(url::Host::Ipv6(ip)) => ip.to_string(),
            _ => return Err(InvalidUrlError::MissingHost),
        };
        let port = url
            .port_or_known_default()
            .ok_or(InvalidUrlError::MissingHost)?;

        Ok(Host::new(name, port))
    }

    /// Validates `input` and checks that its host resolves.
    ///
    /// Resolution is skipped entirely when the syntax check fails.
    pub async fn validate(&self, input: &str) -> Result<Host, InvalidUrlError> {
        let host = Self::parse(input)?;
        trace!(host = %host, "resolving host");

        match tokio::time::timeout(self.settings.resolve_timeout, self.resolver.resolves(&host))
            .await
        {
            Ok(true) => Ok(host),
            Ok(false) => Err(InvalidUrlError::Unresolvable(host.name().to_string())),
            Err(_) => {
                debug!(host = %host, timeout = ?self.settings.resolve_timeout, "host lookup timed out");
                Err(InvalidUrlError::ResolutionTimedOut(host.name().to_string()))
            }
        }
    }
}
