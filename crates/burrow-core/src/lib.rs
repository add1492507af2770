//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the shared vocabulary used by the storage backends,
//! the code generators, the shortener service and the HTTP gateway.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{CoreError, InvalidUrlError, ShortenerError, StorageError};
pub use repository::{Conflict, InsertOutcome, ReadRepository, Repository, UrlMapping};
pub use shortcode::ShortCode;
pub use shortener::{Allocator, Resolver};
