//! Permission override entity <-> model mapper

use authz_core::entities::{OverrideScope, OverrideTarget, PermissionOverride};
use authz_core::error::DomainError;
use authz_core::value_objects::{Permissions, Snowflake};

use crate::models::OverrideModel;

/// Convert OverrideModel to PermissionOverride entity
impl TryFrom<OverrideModel> for PermissionOverride {
    type Error = DomainError;

    fn try_from(model: OverrideModel) -> Result<Self, Self::Error> {
        let scope = OverrideScope::from_parts(&model.scope_type, Snowflake::new(model.scope_id))
            .ok_or_else(|| {
                DomainError::DatabaseError(format!("unknown override scope '{}'", model.scope_type))
            })?;
        let target = OverrideTarget::from_parts(&model.target_type, Snowflake::new(model.target_id))
            .ok_or_else(|| {
                DomainError::DatabaseError(format!("unknown override target '{}'", model.target_type))
            })?;

        Ok(PermissionOverride {
            id: Snowflake::new(model.id),
            scope,
            target,
            allow: Permissions::from_i64(model.allow_bits),
            deny: Permissions::from_i64(model.deny_bits),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Convert a batch of rows, failing on the first invalid one
pub fn overrides_from_models(models: Vec<OverrideModel>) -> Result<Vec<PermissionOverride>, DomainError> {
    models.into_iter().map(PermissionOverride::try_from).collect()
}
