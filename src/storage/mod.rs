//! Storage layer for Libris - whole-file JSON persistence.
//!
//! Each record kind is stored as its own unit, alongside a fourth unit
//! holding the identifier counters. Units are always overwritten in full.

mod json;
mod traits;

pub use json::JsonStorage;
pub use traits::{CatalogSnapshot, Storage, Unit};
