//! Base authority - a user's effective tier and permissions in one program
//!
//! Resolution order:
//! 1. Platform super admins are Owner with every permission
//! 2. The program owner is Owner with every permission
//! 3. Members get the minimum tier and the union of permissions over their roles

use serde::Serialize;

use crate::entities::{MemberRoles, Program, User};
use crate::error::DomainError;
use crate::value_objects::{Permissions, Snowflake, Tier};

/// Why a user holds the authority they do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoritySource {
    SuperAdmin,
    Owner,
    Member,
}

/// Resolved authorization context for `(user, program)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authority {
    pub user_id: Snowflake,
    pub program_id: Snowflake,
    pub tier: Tier,
    pub permissions: Permissions,
    /// Roles held through membership (empty for owners and super admins
    /// without a membership)
    pub role_ids: Vec<Snowflake>,
    pub source: AuthoritySource,
}

impl Authority {
    /// Resolve authority from already-fetched records
    ///
    /// `membership` is only consulted when the user is neither a super admin
    /// nor the program owner.
    pub fn resolve(
        user: &User,
        program: &Program,
        membership: Option<&MemberRoles>,
    ) -> Result<Self, DomainError> {
        if user.is_super_admin {
            return Ok(Self::owner(user.id, program.id, AuthoritySource::SuperAdmin, membership));
        }
        if program.is_owner(user.id) {
            return Ok(Self::owner(user.id, program.id, AuthoritySource::Owner, membership));
        }
        let membership = membership.ok_or(DomainError::NotAMember)?;
        Ok(Self::from_member_roles(membership))
    }

    /// Authority derived purely from a membership's roles
    pub fn from_member_roles(member: &MemberRoles) -> Self {
        Self {
            user_id: member.membership.user_id,
            program_id: member.membership.program_id,
            tier: member.effective_tier(),
            permissions: Permissions::combine(member.roles.iter().map(|r| r.permissions)),
            role_ids: member.role_ids(),
            source: AuthoritySource::Member,
        }
    }

    fn owner(
        user_id: Snowflake,
        program_id: Snowflake,
        source: AuthoritySource,
        membership: Option<&MemberRoles>,
    ) -> Self {
        Self {
            user_id,
            program_id,
            tier: Tier::Owner,
            permissions: Permissions::ALL,
            role_ids: membership.map(MemberRoles::role_ids).unwrap_or_default(),
            source,
        }
    }

    #[inline]
    pub fn is_owner_tier(&self) -> bool {
        self.tier == Tier::Owner
    }

    /// Check a program-level permission (ADMINISTRATOR bypasses)
    #[inline]
    pub fn has(&self, permission: Permissions) -> bool {
        self.permissions.has_all(permission)
    }

    /// Owner tier or the given permission
    pub fn require_owner_or(&self, permission: Permissions) -> Result<(), DomainError> {
        if self.is_owner_tier() || self.has(permission) {
            return Ok(());
        }
        Err(DomainError::MissingPermission(permission.to_names().join(", ")))
    }
}
