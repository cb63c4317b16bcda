//! Core types for the Cinedex movie catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod document;
pub mod entity;
pub mod error;
pub mod query;
pub mod report;

pub use error::{Error, Result};
