//! Batch CSV loader for the relational store.
//!
//! Reads the nine-file extract from a directory and imports it in
//! dependency order, one all-or-nothing transaction per entity. Rows that
//! violate a constraint are skipped and counted, never fatal.

pub mod error;
pub mod extract;
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use loader::Loader;
