//! User entity <-> model mapper

use authz_core::entities::User;
use authz_core::value_objects::Snowflake;

use crate::models::UserModel;

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: Snowflake::new(model.id),
            username: model.username,
            is_super_admin: model.is_super_admin,
            created_at: model.created_at,
        }
    }
}
