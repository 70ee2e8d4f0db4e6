//! Role database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for roles table
#[derive(Debug, Clone, FromRow)]
pub struct RoleModel {
    pub id: i64,
    pub program_id: i64,
    pub name: String,
    pub color: i32,
    /// Tier value 0-3 (`SMALLINT`)
    pub tier: i16,
    pub permissions: i64,
    pub is_everyone: bool,
    pub is_hoisted: bool,
    pub is_mentionable: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
