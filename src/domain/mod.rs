//! Domain types for Libris
//!
//! This module contains the three record kinds kept by the catalog:
//! - Member: a library patron
//! - Title: a catalogued book, with a derived availability flag
//! - Loan: one member borrowing one title, outstanding until returned
//!
//! Every record converts to and from a generic key/value mapping; the
//! conversion is the same one used for persistence.

pub mod loan;
pub mod member;
pub mod title;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::fmt;

pub use loan::{Loan, LoanStatus, today};
pub use member::Member;
pub use title::Title;

use crate::error::Result;

/// Identifier value of a record that has not been given one yet.
pub const UNASSIGNED: u64 = 0;

/// The kinds of record that carry their own identifier sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Member,
    Title,
    Loan,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Member => write!(f, "member"),
            EntityKind::Title => write!(f, "title"),
            EntityKind::Loan => write!(f, "loan"),
        }
    }
}

/// A record with a numeric identifier that round-trips through a key/value mapping.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Which identifier sequence this record draws from
    const KIND: EntityKind;

    /// The record's identifier, `UNASSIGNED` until allocated
    fn id(&self) -> u64;

    fn set_id(&mut self, id: u64);

    /// Export to a mapping with keys in declaration order.
    fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "{} did not serialize to a mapping",
                Self::KIND
            ))
            .into()),
        }
    }

    /// Import from a mapping; absent fields take their documented defaults.
    fn from_map(map: Map<String, Value>) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

/// Case-insensitive substring match of `needle` against any of `fields`.
///
/// `needle` must already be lowercased.
pub(crate) fn matches_any<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    fields.into_iter().any(|field| field.to_lowercase().contains(needle))
}
