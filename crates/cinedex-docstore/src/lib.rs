//! Embedded document store for the denormalized catalog.
//!
//! Documents live as JSON bodies in per-collection SQLite tables; a
//! registry table tracks which collections exist so readers can fail
//! loudly on a collection that was never migrated. The document side of
//! the query library runs as in-memory joins over the flat collections.

pub mod error;
pub mod names;
pub mod queries;
pub mod store;


pub use error::{Error, Result};
pub use store::DocStore;
