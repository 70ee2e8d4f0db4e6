//! Program entity - a Discord-like server that owns roles and channels

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Program (server) entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    /// Create a new Program
    pub fn new(id: Snowflake, name: String, owner_id: Snowflake) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if a user is the program owner
    #[inline]
    pub fn is_owner(&self, user_id: Snowflake) -> bool {
        self.owner_id == user_id
    }
}
