//! URL shortener service implementation.
//!
//! This crate validates submitted URLs, allocates short codes against a
//! [`Repository`](burrow_core::Repository) and resolves codes back to URLs.
//! Core types are re-exported from `burrow_core`.

pub mod service;
pub mod validator;

pub use burrow_core::{Allocator, Resolver, ShortenerError, UrlMapping};
pub use service::{ShortenerService, ShortenerSettings};
pub use validator::{
    DnsResolver, Host, HostResolver, StaticResolver, UrlValidator, ValidatorSettings,
    MAX_URL_LENGTH,
};
