//! Core domain model for skrytki.
//!
//! This crate defines the registry data model (entities and their
//! electronic mailbox addresses), the SQLite schema, the SQL helper
//! functions used by the fuzzy search, and a bounded connection pool.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod schema;
pub mod trigram;

pub use error::{Error, Result};
