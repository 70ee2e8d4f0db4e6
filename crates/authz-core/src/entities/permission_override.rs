//! Permission override entity - scoped allow/deny bits on a channel or category

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{Permissions, Snowflake};

/// Where an override applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverrideScope {
    Channel(Snowflake),
    Category(Snowflake),
}

impl OverrideScope {
    /// Value stored in the `scope_type` column
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Channel(_) => "channel",
            Self::Category(_) => "category",
        }
    }

    pub const fn id(self) -> Snowflake {
        match self {
            Self::Channel(id) | Self::Category(id) => id,
        }
    }

    /// Rebuild from stored columns
    pub fn from_parts(type_name: &str, id: Snowflake) -> Option<Self> {
        match type_name {
            "channel" => Some(Self::Channel(id)),
            "category" => Some(Self::Category(id)),
            _ => None,
        }
    }
}

/// Who an override applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum OverrideTarget {
    Role(Snowflake),
    User(Snowflake),
}

impl OverrideTarget {
    /// Value stored in the `target_type` column
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Role(_) => "role",
            Self::User(_) => "user",
        }
    }

    pub const fn id(self) -> Snowflake {
        match self {
            Self::Role(id) | Self::User(id) => id,
        }
    }

    pub fn from_parts(type_name: &str, id: Snowflake) -> Option<Self> {
        match type_name {
            "role" => Some(Self::Role(id)),
            "user" => Some(Self::User(id)),
            _ => None,
        }
    }
}

/// Permission override entity
///
/// At most one exists per `(scope, target)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionOverride {
    pub id: Snowflake,
    pub scope: OverrideScope,
    pub target: OverrideTarget,
    pub allow: Permissions,
    pub deny: Permissions,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PermissionOverride {
    pub fn new(
        id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
        allow: Permissions,
        deny: Permissions,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            scope,
            target,
            allow,
            deny,
            created_at: now,
            updated_at: now,
        }
    }

    /// Denied bits; ADMINISTRATOR is never overridable
    #[inline]
    pub fn effective_deny(&self) -> Permissions {
        self.deny - Permissions::ADMINISTRATOR
    }

    /// Allowed bits after deny wins over allow within this record
    #[inline]
    pub fn effective_allow(&self) -> Permissions {
        self.allow - self.deny - Permissions::ADMINISTRATOR
    }

    /// Bits set in both allow and deny
    #[inline]
    pub fn overlap(&self) -> Permissions {
        self.allow & self.deny
    }
}
