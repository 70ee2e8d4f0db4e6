//! Program entity <-> model mapper

use authz_core::entities::Program;
use authz_core::value_objects::Snowflake;

use crate::models::ProgramModel;

/// Convert ProgramModel to Program entity
impl From<ProgramModel> for Program {
    fn from(model: ProgramModel) -> Self {
        Program {
            id: Snowflake::new(model.id),
            name: model.name,
            owner_id: Snowflake::new(model.owner_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
