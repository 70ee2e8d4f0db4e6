//! Membership database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for memberships table
#[derive(Debug, Clone, FromRow)]
pub struct MembershipModel {
    pub id: i64,
    pub program_id: i64,
    pub user_id: i64,
    pub nickname: Option<String>,
    pub joined_at: DateTime<Utc>,
}
