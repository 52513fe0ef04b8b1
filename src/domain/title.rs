//! Title record

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityKind, Record, UNASSIGNED, matches_any};

/// A catalogued book.
///
/// `available` is derived from the loan collection: it is true unless an
/// outstanding loan references this title. Only the catalog writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    #[serde(default)]
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub isbn: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Title {
    /// Create an available title without an identifier.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: UNASSIGNED,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            description: description.into(),
            available: true,
        }
    }

    /// Match against title, author, id, or ISBN. `needle` is lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        let id = self.id.to_string();
        matches_any(needle, [self.title.as_str(), self.author.as_str(), id.as_str(), self.isbn.as_str()])
    }
}

impl Record for Title {
    const KIND: EntityKind = EntityKind::Title;

    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.available { "Available" } else { "On loan" };
        write!(
            f,
            "ID: {} | Title: {} | Author: {} | ISBN: {} | Status: {}",
            self.id, self.title, self.author, self.isbn, state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Title {
        let mut title = Title::new("Dune", "Frank Herbert", "978-0441", "Desert planet");
        title.id = 3;
        title
    }

    #[test]
    fn test_new_title_is_available() {
        let title = Title::new("Dune", "Herbert", "111", "");
        assert!(title.available);
        assert_eq!(title.id, UNASSIGNED);
    }

    #[test]
    fn test_export_field_order() {
        let map = dune().to_map().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "title", "author", "isbn", "description", "available"]);
    }

    #[test]
    fn test_import_is_inverse_of_export() {
        let mut title = dune();
        title.available = false;
        let restored = Title::from_map(title.to_map().unwrap()).unwrap();
        assert_eq!(restored, title);
    }

    #[test]
    fn test_import_defaults_available_to_true() {
        let map = json!({"id": 9, "title": "Emma"}).as_object().unwrap().clone();
        let title = Title::from_map(map).unwrap();
        assert_eq!(title.id, 9);
        assert!(title.available);
        assert_eq!(title.isbn, "");
    }

    #[test]
    fn test_matches_search_fields() {
        let title = dune();
        assert!(title.matches("dune"));
        assert!(title.matches("herbert"));
        assert!(title.matches("0441"));
        assert!(title.matches("3"));
        // description is not a search field
        assert!(!title.matches("desert"));
    }

    #[test]
    fn test_display_shows_status() {
        let mut title = dune();
        assert!(title.to_string().ends_with("Status: Available"));
        title.available = false;
        assert!(title.to_string().ends_with("Status: On loan"));
    }
}
