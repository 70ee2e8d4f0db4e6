//! Role mutation guard
//!
//! Authorizes role create, update, delete, assign and unassign requests.
//! Checks run in a fixed order so callers see the same error for the same
//! request. Create and update need tier authority and MANAGE_ROLES; delete,
//! assign and unassign need tier authority only.

use crate::entities::{MemberRoles, Role};
use crate::error::DomainError;
use crate::value_objects::{Permissions, Tier};

use super::Authority;

/// A role about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: String,
    pub tier: Tier,
    pub permissions: Permissions,
}

impl RoleDraft {
    pub fn new(name: impl Into<String>, tier: Tier, permissions: Permissions) -> Self {
        Self {
            name: name.into(),
            tier,
            permissions,
        }
    }
}

/// Requested changes to an existing role; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub tier: Option<Tier>,
    pub permissions: Option<Permissions>,
}

impl RoleChanges {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn tier(mut self, tier: Tier) -> Self {
        self.tier = Some(tier);
        self
    }

    #[must_use]
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.tier.is_none() && self.permissions.is_none()
    }

    /// Apply onto a role in place
    pub fn apply(&self, role: &mut Role) {
        if let Some(name) = &self.name {
            role.set_name(name.clone());
        }
        if let Some(tier) = self.tier {
            role.set_tier(tier);
        }
        if let Some(permissions) = self.permissions {
            role.set_permissions(permissions);
        }
    }
}

/// Pure authorization checks for role management
pub struct RoleMutationGuard;

impl RoleMutationGuard {
    /// Authorize creating `draft` among the program's `existing` roles
    pub fn check_create(
        actor: &Authority,
        draft: &RoleDraft,
        existing: &[Role],
    ) -> Result<(), DomainError> {
        Self::check_tier(actor, draft.tier)?;
        Self::check_manage_roles(actor)?;
        Self::check_name(&draft.name, None, existing)?;
        draft.tier.check_ceiling(draft.permissions)
    }

    /// Authorize applying `changes` to `role`
    ///
    /// Callers who may not edit the role at all are rejected before the
    /// `@everyone` immutability check. Tier authority is then checked against
    /// the resulting tier too. The ceiling is checked on the resulting
    /// `(tier, permissions)` pair, so lowering a tier beneath the role's
    /// current grants fails.
    pub fn check_update(
        actor: &Authority,
        role: &Role,
        changes: &RoleChanges,
        existing: &[Role],
    ) -> Result<(), DomainError> {
        Self::check_tier(actor, role.tier)?;
        Self::check_manage_roles(actor)?;

        if role.is_everyone {
            let renamed = changes.name.as_deref().is_some_and(|n| n != role.name);
            let moved = changes.tier.is_some_and(|t| t != role.tier);
            if renamed || moved {
                return Err(DomainError::EveryoneRoleImmutable);
            }
        }

        let tier = changes.tier.unwrap_or(role.tier);
        Self::check_tier(actor, tier)?;

        if let Some(name) = &changes.name {
            if !role.is_everyone {
                Self::check_name(name, Some(role), existing)?;
            }
        }

        tier.check_ceiling(changes.permissions.unwrap_or(role.permissions))
    }

    /// Authorize deleting `role`
    pub fn check_delete(actor: &Authority, role: &Role) -> Result<(), DomainError> {
        if role.is_everyone {
            return Err(DomainError::CannotDeleteEveryone);
        }
        Self::check_tier(actor, role.tier)
    }

    /// Authorize granting `role` to `member`
    pub fn check_assign(
        actor: &Authority,
        role: &Role,
        member: &MemberRoles,
    ) -> Result<(), DomainError> {
        Self::check_assignment(actor, role)?;
        if member.has_role(role.id) {
            return Err(DomainError::AlreadyAssigned);
        }
        Ok(())
    }

    /// Authorize revoking `role` from `member`
    pub fn check_unassign(
        actor: &Authority,
        role: &Role,
        member: &MemberRoles,
    ) -> Result<(), DomainError> {
        Self::check_assignment(actor, role)?;
        if !member.has_role(role.id) {
            return Err(DomainError::NotAssigned);
        }
        Ok(())
    }

    fn check_assignment(actor: &Authority, role: &Role) -> Result<(), DomainError> {
        if role.is_everyone {
            return Err(DomainError::EveryoneAutoAssigned);
        }
        Self::check_tier(actor, role.tier)
    }

    fn check_tier(actor: &Authority, target: Tier) -> Result<(), DomainError> {
        if actor.tier.can_manage(target) {
            Ok(())
        } else {
            Err(DomainError::InsufficientTierAuthority {
                actor: actor.tier,
                target,
            })
        }
    }

    fn check_manage_roles(actor: &Authority) -> Result<(), DomainError> {
        if actor.is_owner_tier() || actor.has(Permissions::MANAGE_ROLES) {
            Ok(())
        } else {
            Err(DomainError::MissingManageRolesPermission)
        }
    }

    /// Reserved and duplicate name checks; `current` is excluded from the
    /// duplicate scan
    fn check_name(name: &str, current: Option<&Role>, existing: &[Role]) -> Result<(), DomainError> {
        if name == Role::EVERYONE_NAME {
            return Err(DomainError::ReservedRoleName);
        }
        let taken = existing
            .iter()
            .filter(|r| current.map_or(true, |c| c.id != r.id))
            .any(|r| r.name == name);
        if taken {
            return Err(DomainError::DuplicateRoleName(name.to_string()));
        }
        Ok(())
    }
}
