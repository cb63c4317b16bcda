//! Denormalization pipeline: title resolution, flattening, and
//! `movies_complete` assembly.
//!
//! Stages run in order against a loaded relational store: [`resolve`]
//! fixes up the movie-title flags, [`flatten`] mirrors every table into
//! the document store, and [`assemble`] builds the per-movie documents
//! from those mirrors.

pub mod assemble;
pub mod error;
pub mod flatten;
pub mod resolve;


pub use assemble::{AssembleOptions, JoinMode, assemble};
pub use error::{Error, Result};
pub use flatten::flatten;
pub use resolve::{ResolutionReport, resolve_titles};
