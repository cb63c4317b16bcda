//! JSON REST API for Cinedex.
//!
//! Exposes an axum [`Router`] over the relational store (browsing and
//! search) and the document store (movie detail). Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", cinedex_api::api_router(state))
//! ```

pub mod catalog;
pub mod error;
pub mod films;
pub mod movies;
pub mod search;


use axum::{Router, routing::get};
use cinedex_docstore::DocStore;
use cinedex_store_sqlite::SqliteStore;

pub use error::ApiError;

/// Shared handler state: the two stores, both cheaply cloneable.
#[derive(Clone)]
pub struct ApiState {
  pub store: SqliteStore,
  pub docs:  DocStore,
}

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router(state: ApiState) -> Router<()> {
  Router::new()
    // Browsing
    .route("/films", get(films::list))
    .route("/movies/{id}", get(movies::get_one))
    .route("/movies/{id}/related", get(movies::related))
    // Search
    .route("/search/titles", get(search::titles))
    .route("/search/persons", get(search::persons))
    // Catalog
    .route("/stats", get(catalog::stats))
    .route("/genres", get(catalog::genres))
    .route("/top", get(catalog::top))
    .route("/random", get(catalog::random))
    .with_state(state)
}
