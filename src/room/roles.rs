//! Privilege registry.
//!
//! Super-admins are fixed at startup and never stored in the mutable
//! moderator set, so no runtime command can revoke them.

use std::collections::BTreeSet;

/// Privilege level of a chat sender, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Member,
    Moderator,
    SuperAdmin,
}

impl Role {
    pub fn is_moderator(self) -> bool {
        self >= Role::Moderator
    }

    pub fn is_super_admin(self) -> bool {
        self == Role::SuperAdmin
    }
}

/// Outcome of a moderator set mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Changed,
    Unchanged,
    /// Target is a super-admin; the mutable set was not touched.
    Protected,
}

#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    super_admins: BTreeSet<String>,
    moderators: BTreeSet<String>,
}

impl RoleRegistry {
    pub fn new<A, M>(super_admins: A, moderators: M) -> Self
    where
        A: IntoIterator<Item = String>,
        M: IntoIterator<Item = String>,
    {
        let super_admins: BTreeSet<String> = super_admins.into_iter().collect();
        let moderators = moderators
            .into_iter()
            .filter(|m| !super_admins.contains(m))
            .collect();
        Self {
            super_admins,
            moderators,
        }
    }

    pub fn is_super_admin(&self, username: &str) -> bool {
        self.super_admins.contains(username)
    }

    pub fn is_moderator(&self, username: &str) -> bool {
        self.is_super_admin(username) || self.moderators.contains(username)
    }

    pub fn role_of(&self, username: &str) -> Role {
        if self.is_super_admin(username) {
            Role::SuperAdmin
        } else if self.is_moderator(username) {
            Role::Moderator
        } else {
            Role::Member
        }
    }

    pub fn add_moderator(&mut self, username: &str) -> RoleChange {
        if self.is_super_admin(username) {
            return RoleChange::Protected;
        }
        if self.moderators.insert(username.to_string()) {
            RoleChange::Changed
        } else {
            RoleChange::Unchanged
        }
    }

    /// Removing a super-admin is a no-op reported as `Protected`.
    pub fn remove_moderator(&mut self, username: &str) -> RoleChange {
        if self.is_super_admin(username) {
            return RoleChange::Protected;
        }
        if self.moderators.remove(username) {
            RoleChange::Changed
        } else {
            RoleChange::Unchanged
        }
    }

    /// Super-admins in name order.
    pub fn super_admins(&self) -> impl Iterator<Item = &str> {
        self.super_admins.iter().map(String::as_str)
    }

    /// Runtime moderators in name order (super-admins excluded).
    pub fn moderators(&self) -> impl Iterator<Item = &str> {
        self.moderators.iter().map(String::as_str)
    }
}
