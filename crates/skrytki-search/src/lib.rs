//! Fuzzy search for skrytki.
//!
//! [`searcher`] runs the tiered search over one connection: exact registry
//! number, then case-insensitive substring ranked by trigram similarity,
//! then trigram similarity alone. [`LookupService`] wraps it with input
//! validation, a connection pool, a request deadline and one retry on a
//! fresh connection.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod query;
pub mod searcher;
pub mod service;

#[cfg(test)]
mod test_support;

pub use error::LookupError;
pub use query::{SearchQuery, DEFAULT_LIMIT};
pub use searcher::{SearchOutcome, SearchResult};
pub use service::LookupService;
