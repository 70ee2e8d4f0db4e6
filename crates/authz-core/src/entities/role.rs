//! Role entity - a named, tiered permission grant within one program

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::value_objects::{Permissions, Snowflake, Tier};

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub program_id: Snowflake,
    pub name: String,
    /// Display color (RGB), not used for authorization
    pub color: i32,
    pub tier: Tier,
    pub permissions: Permissions,
    pub is_everyone: bool,
    pub is_hoisted: bool,
    pub is_mentionable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Fixed name of the default role every member holds
    pub const EVERYONE_NAME: &'static str = "@everyone";

    /// Create a new Role
    pub fn new(
        id: Snowflake,
        program_id: Snowflake,
        name: String,
        tier: Tier,
        permissions: Permissions,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            program_id,
            name,
            color: 0,
            tier,
            permissions,
            is_everyone: false,
            is_hoisted: false,
            is_mentionable: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the @everyone role for a program
    pub fn everyone(id: Snowflake, program_id: Snowflake) -> Self {
        Self {
            is_everyone: true,
            ..Self::new(
                id,
                program_id,
                Self::EVERYONE_NAME.to_string(),
                Tier::Member,
                Permissions::DEFAULT,
            )
        }
    }

    /// Check if this role grants a specific permission
    #[inline]
    pub fn has_permission(&self, permission: Permissions) -> bool {
        self.permissions.has(permission)
    }

    /// Check the ceiling invariant: `permissions & !ceiling(tier) == 0`
    pub fn check_ceiling(&self) -> Result<(), DomainError> {
        self.tier.check_ceiling(self.permissions)
    }

    /// Get the color as a hex string (without #)
    pub fn color_hex(&self) -> String {
        format!("{:06x}", self.color)
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
        self.updated_at = Utc::now();
    }

    pub fn set_permissions(&mut self, permissions: Permissions) {
        self.permissions = permissions;
        self.updated_at = Utc::now();
    }

    pub fn set_color(&mut self, color: i32) {
        self.color = color;
        self.updated_at = Utc::now();
    }

    pub fn set_hoisted(&mut self, hoisted: bool) {
        self.is_hoisted = hoisted;
        self.updated_at = Utc::now();
    }

    pub fn set_mentionable(&mut self, mentionable: bool) {
        self.is_mentionable = mentionable;
        self.updated_at = Utc::now();
    }
}
