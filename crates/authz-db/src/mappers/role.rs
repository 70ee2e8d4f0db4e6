//! Role entity <-> model mapper

use authz_core::entities::Role;
use authz_core::error::DomainError;
use authz_core::value_objects::{Permissions, Snowflake, Tier};

use crate::models::RoleModel;

/// Convert RoleModel to Role entity
///
/// Unknown permission bits are dropped; an out-of-range tier is rejected.
impl TryFrom<RoleModel> for Role {
    type Error = DomainError;

    fn try_from(model: RoleModel) -> Result<Self, Self::Error> {
        Ok(Role {
            id: Snowflake::new(model.id),
            program_id: Snowflake::new(model.program_id),
            name: model.name,
            color: model.color,
            tier: Tier::try_from(model.tier)?,
            permissions: Permissions::from_i64(model.permissions),
            is_everyone: model.is_everyone,
            is_hoisted: model.is_hoisted,
            is_mentionable: model.is_mentionable,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first invalid one
pub fn roles_from_models(models: Vec<RoleModel>) -> Result<Vec<Role>, DomainError> {
    models.into_iter().map(Role::try_from).collect()
}
