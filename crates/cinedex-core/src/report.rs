//! Import accounting shared by the loader and the store.

use serde::Serialize;

/// Outcome of one all-or-nothing entity import.
///
/// `skipped` counts rows rejected by a uniqueness, foreign-key, or check
/// constraint. Such rows are never fatal; a connection-level failure rolls
/// the whole entity back instead and surfaces as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
  pub entity:    &'static str,
  pub attempted: usize,
  pub inserted:  usize,
  pub skipped:   usize,
}

impl ImportReport {
  pub fn new(entity: &'static str) -> Self {
    Self { entity, attempted: 0, inserted: 0, skipped: 0 }
  }
}
