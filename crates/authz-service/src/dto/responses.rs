//! Response DTOs
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Snowflake IDs and permission sets are serialized as strings for
//! JavaScript compatibility.

use authz_core::{AuthoritySource, OverrideScope, OverrideTarget, Permissions, Snowflake, Tier};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Program response
#[derive(Debug, Clone, Serialize)]
pub struct ProgramResponse {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
    pub everyone_role_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

/// Role response
#[derive(Debug, Clone, Serialize)]
pub struct RoleResponse {
    pub id: Snowflake,
    pub program_id: Snowflake,
    pub name: String,
    pub color: i32,
    pub tier: Tier,
    pub permissions: Permissions,
    pub permission_names: Vec<&'static str>,
    pub is_everyone: bool,
    pub hoist: bool,
    pub mentionable: bool,
}

/// Resolved authority of one user in one program
#[derive(Debug, Clone, Serialize)]
pub struct AuthorityResponse {
    pub user_id: Snowflake,
    pub program_id: Snowflake,
    pub tier: Tier,
    pub permissions: Permissions,
    pub permission_names: Vec<&'static str>,
    pub role_ids: Vec<Snowflake>,
    pub source: AuthoritySource,
}

/// Permission override response
#[derive(Debug, Clone, Serialize)]
pub struct OverrideResponse {
    pub id: Snowflake,
    pub scope: OverrideScope,
    pub target: OverrideTarget,
    pub allow: Permissions,
    pub deny: Permissions,
    pub updated_at: DateTime<Utc>,
}
