//! Member operations

use super::{Catalog, require};
use crate::domain::Member;
use crate::error::Result;
use crate::storage::Storage;

/// Fields to change on an existing member; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl MemberPatch {
    fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            require(name, "name")?;
        }
        if let Some(email) = &self.email {
            require(email, "email")?;
        }
        Ok(())
    }

    fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(email) = self.email {
            member.email = email;
        }
        if let Some(phone) = self.phone {
            member.phone = phone;
        }
    }
}

impl<S: Storage> Catalog<S> {
    /// Register a new member. Name and email are required.
    pub fn add_member(&mut self, name: &str, email: &str, phone: &str) -> Result<Member> {
        require(name, "name")?;
        require(email, "email")?;

        let mut member = Member::new(name, email, phone);
        self.ids.claim(&mut member);
        self.members.push(member.clone());
        self.persist()?;

        log::info!("Registered member {} ({})", member.id, member.name);
        Ok(member)
    }

    /// Members whose name, email, phone or id contains `query`, ignoring case.
    pub fn find_member(&self, query: &str) -> Vec<&Member> {
        let needle = query.to_lowercase();
        self.members.iter().filter(|m| m.matches(&needle)).collect()
    }

    pub fn get_member(&self, id: u64) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn list_members(&self) -> &[Member] {
        &self.members
    }

    /// Apply `patch` to member `id`. Returns false if no such member exists.
    pub fn update_member(&mut self, id: u64, patch: MemberPatch) -> Result<bool> {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            log::debug!("Update skipped, member {} not found", id);
            return Ok(false);
        };
        patch.validate()?;
        patch.apply(member);
        self.persist()?;

        log::info!("Updated member {}", id);
        Ok(true)
    }

    /// Remove member `id`. Their loans are kept and become orphaned.
    pub fn delete_member(&mut self, id: u64) -> Result<bool> {
        let Some(pos) = self.members.iter().position(|m| m.id == id) else {
            log::debug!("Delete skipped, member {} not found", id);
            return Ok(false);
        };
        self.members.remove(pos);
        self.persist()?;

        log::info!("Deleted member {}", id);
        Ok(true)
    }
}
