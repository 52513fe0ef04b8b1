//! Title operations

use super::{Catalog, require};
use crate::domain::Title;
use crate::error::Result;
use crate::storage::Storage;

/// Descriptive fields to change on an existing title.
///
/// Availability is not editable; it always follows the loans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
}

impl TitlePatch {
    fn apply(self, title: &mut Title) {
        if let Some(value) = self.title {
            title.title = value;
        }
        if let Some(author) = self.author {
            title.author = author;
        }
        if let Some(isbn) = self.isbn {
            title.isbn = isbn;
        }
        if let Some(description) = self.description {
            title.description = description;
        }
    }
}

impl<S: Storage> Catalog<S> {
    /// Catalogue a new title. It starts available. Duplicate ISBNs are allowed.
    pub fn add_title(&mut self, title: &str, author: &str, isbn: &str, description: &str) -> Result<Title> {
        require(title, "title")?;

        let mut record = Title::new(title, author, isbn, description);
        self.ids.claim(&mut record);
        self.titles.push(record.clone());
        self.persist()?;

        log::info!("Catalogued title {} ({})", record.id, record.title);
        Ok(record)
    }

    /// Titles whose title, author, id or ISBN contains `query`, ignoring case.
    pub fn find_title(&self, query: &str) -> Vec<&Title> {
        let needle = query.to_lowercase();
        self.titles.iter().filter(|t| t.matches(&needle)).collect()
    }

    pub fn get_title(&self, id: u64) -> Option<&Title> {
        self.titles.iter().find(|t| t.id == id)
    }

    pub fn list_titles(&self) -> &[Title] {
        &self.titles
    }

    /// Apply `patch` to title `id`. Returns false if no such title exists.
    pub fn update_title(&mut self, id: u64, patch: TitlePatch) -> Result<bool> {
        let Some(title) = self.titles.iter_mut().find(|t| t.id == id) else {
            log::debug!("Update skipped, title {} not found", id);
            return Ok(false);
        };
        if let Some(value) = &patch.title {
            require(value, "title")?;
        }
        patch.apply(title);
        self.persist()?;

        log::info!("Updated title {}", id);
        Ok(true)
    }

    /// Remove title `id`. Loans that reference it are kept and become orphaned.
    pub fn delete_title(&mut self, id: u64) -> Result<bool> {
        let Some(pos) = self.titles.iter().position(|t| t.id == id) else {
            log::debug!("Delete skipped, title {} not found", id);
            return Ok(false);
        };
        self.titles.remove(pos);
        self.persist()?;

        log::info!("Deleted title {}", id);
        Ok(true)
    }
}
