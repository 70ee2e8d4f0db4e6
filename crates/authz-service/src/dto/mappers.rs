//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use authz_core::entities::{PermissionOverride, Role};
use authz_core::Authority;

use super::responses::{AuthorityResponse, OverrideResponse, RoleResponse};

impl From<&Role> for RoleResponse {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            program_id: role.program_id,
            name: role.name.clone(),
            color: role.color,
            tier: role.tier,
            permissions: role.permissions,
            permission_names: role.permissions.to_names(),
            is_everyone: role.is_everyone,
            hoist: role.is_hoisted,
            mentionable: role.is_mentionable,
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self::from(&role)
    }
}

impl From<&Authority> for AuthorityResponse {
    fn from(authority: &Authority) -> Self {
        Self {
            user_id: authority.user_id,
            program_id: authority.program_id,
            tier: authority.tier,
            permissions: authority.permissions,
            permission_names: authority.permissions.to_names(),
            role_ids: authority.role_ids.clone(),
            source: authority.source,
        }
    }
}

impl From<Authority> for AuthorityResponse {
    fn from(authority: Authority) -> Self {
        Self::from(&authority)
    }
}

impl From<&PermissionOverride> for OverrideResponse {
    fn from(ovr: &PermissionOverride) -> Self {
        Self {
            id: ovr.id,
            scope: ovr.scope,
            target: ovr.target,
            allow: ovr.allow,
            deny: ovr.deny,
            updated_at: ovr.updated_at,
        }
    }
}

impl From<PermissionOverride> for OverrideResponse {
    fn from(ovr: PermissionOverride) -> Self {
        Self::from(&ovr)
    }
}
