//! SQLite implementation of the Cinedex relational store.
//!
//! [`SqliteStore`] owns the single write connection; there is no ambient
//! global handle. Batch inserts, table dumps, and the relational side of
//! the query library all live here.

pub mod error;
pub mod queries;
pub mod schema;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use store::SqliteStore;
