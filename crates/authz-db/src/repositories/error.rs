//! SQLx error translation for repositories
//!
//! Schema constraints that mirror a domain rule are reported as that rule's
//! error; anything else passes through as `DatabaseError`.

use authz_core::error::DomainError;
use authz_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert a SQLx error, recognizing the schema's named check constraints
pub fn map_db_error(e: SqlxError) -> DomainError {
    e.as_database_error()
        .and_then(|db_err| db_err.constraint())
        .and_then(constraint_error)
        .unwrap_or_else(|| DomainError::DatabaseError(e.to_string()))
}

/// Like [`map_db_error`], but a unique violation becomes `on_unique()`
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => on_unique(),
        _ => map_db_error(e),
    }
}

/// Domain error for a violated named constraint
fn constraint_error(constraint: &str) -> Option<DomainError> {
    let err = match constraint {
        "roles_everyone_is_member" | "roles_one_everyone_per_program" => {
            DomainError::EveryoneRoleImmutable
        }
        "permission_overrides_disjoint" => DomainError::ConflictingOverride(
            "bits both allowed and denied".to_string(),
        ),
        "permission_overrides_no_administrator" => DomainError::ConflictingOverride(
            "ADMINISTRATOR cannot be overridden".to_string(),
        ),
        "channels_category_not_nested" => {
            DomainError::ValidationError("categories cannot be nested".to_string())
        }
        _ => return None,
    };
    Some(err)
}

pub fn program_not_found(id: Snowflake) -> DomainError {
    DomainError::ProgramNotFound(id)
}

pub fn channel_not_found(id: Snowflake) -> DomainError {
    DomainError::ChannelNotFound(id)
}

pub fn role_not_found(id: Snowflake) -> DomainError {
    DomainError::RoleNotFound(id)
}
