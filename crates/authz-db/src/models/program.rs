//! Program database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for programs table
#[derive(Debug, Clone, FromRow)]
pub struct ProgramModel {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
