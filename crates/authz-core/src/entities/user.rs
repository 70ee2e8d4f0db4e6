//! User entity - the acting principal of every authorization request

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Platform user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    /// Platform-wide operator; treated as Owner in every program
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: Snowflake, username: String) -> Self {
        Self {
            id,
            username,
            is_super_admin: false,
            created_at: Utc::now(),
        }
    }

    /// Create a platform super admin
    pub fn super_admin(id: Snowflake, username: String) -> Self {
        Self {
            is_super_admin: true,
            ..Self::new(id, username)
        }
    }
}
