//! Mapping store backends.
//!
//! Both backends implement [`Repository`] with an atomic
//! `insert_if_absent` over the short code and long URL constraints.

pub mod memory;
pub mod mysql;

pub use burrow_core::repository::{
    Conflict, InsertOutcome, ReadRepository, Repository, Result, UrlMapping,
};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use mysql::MySqlRepository;
