//! Member record

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityKind, Record, UNASSIGNED, matches_any};

/// A registered library patron
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub phone: String,
}

impl Member {
    /// Create a member without an identifier; the allocator assigns one on registration.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: UNASSIGNED,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Match against name, email, phone, or the decimal id. `needle` is lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let id = self.id.to_string();
        matches_any(needle, [self.name.as_str(), self.email.as_str(), self.phone.as_str(), id.as_str()])
    }
}

impl Record for Member {
    const KIND: EntityKind = EntityKind::Member;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Name: {} | Email: {} | Phone: {}",
            self.id, self.name, self.email, self.phone
        )
    }
}
