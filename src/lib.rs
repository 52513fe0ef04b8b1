//! Libris - a single-user library record keeper
//!
//! Libris tracks members, book titles and loans, keeping each collection in
//! its own JSON file. A title's availability is derived from its loans and is
//! kept consistent after every change.

pub mod catalog;
pub mod domain;
pub mod error;
pub mod id;
pub mod storage;

pub use catalog::Catalog;
pub use error::{LibrisError, Result};
