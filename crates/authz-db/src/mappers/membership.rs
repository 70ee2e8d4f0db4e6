//! Membership entity <-> model mapper

use authz_core::entities::{MemberRoles, Membership, Role};
use authz_core::value_objects::Snowflake;

use crate::models::MembershipModel;

/// Convert MembershipModel to Membership entity
impl From<MembershipModel> for Membership {
    fn from(model: MembershipModel) -> Self {
        Membership {
            id: Snowflake::new(model.id),
            program_id: Snowflake::new(model.program_id),
            user_id: Snowflake::new(model.user_id),
            nickname: model.nickname,
            joined_at: model.joined_at,
        }
    }
}

/// Combine a membership row with its loaded roles
pub fn member_with_roles(model: MembershipModel, roles: Vec<Role>) -> MemberRoles {
    MemberRoles::new(Membership::from(model), roles)
}
