//! Permission override database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for permission_overrides table
#[derive(Debug, Clone, FromRow)]
pub struct OverrideModel {
    pub id: i64,
    /// 'channel' or 'category'
    pub scope_type: String,
    pub scope_id: i64,
    /// 'role' or 'user'
    pub target_type: String,
    pub target_id: i64,
    pub allow_bits: i64,
    pub deny_bits: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
