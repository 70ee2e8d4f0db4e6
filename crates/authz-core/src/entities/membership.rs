//! Membership entity - a user's membership in a program and its role assignments

use chrono::{DateTime, Utc};

use crate::value_objects::{Snowflake, Tier};

use super::Role;

/// Program membership (junction between User and Program)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    pub id: Snowflake,
    pub program_id: Snowflake,
    pub user_id: Snowflake,
    pub nickname: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(id: Snowflake, program_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            id,
            program_id,
            user_id,
            nickname: None,
            joined_at: Utc::now(),
        }
    }
}

/// A membership together with the roles currently assigned to it
///
/// Storage always includes the program's `@everyone` role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRoles {
    pub membership: Membership,
    pub roles: Vec<Role>,
}

impl MemberRoles {
    pub fn new(membership: Membership, roles: Vec<Role>) -> Self {
        Self { membership, roles }
    }

    /// IDs of all assigned roles
    pub fn role_ids(&self) -> Vec<Snowflake> {
        self.roles.iter().map(|r| r.id).collect()
    }

    /// Check if member has a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.roles.iter().any(|r| r.id == role_id)
    }

    /// Most authoritative tier among assigned roles; Member when none
    pub fn effective_tier(&self) -> Tier {
        self.roles.iter().map(|r| r.tier).min().unwrap_or_default()
    }
}
