//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{Permissions, Snowflake, Tier};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("Program not found: {0}")]
    ProgramNotFound(Snowflake),

    #[error("Channel not found: {0}")]
    ChannelNotFound(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Permission override not found")]
    OverrideNotFound,

    #[error("Not a member of this program")]
    NotAMember,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error("Invalid tier value: {0}")]
    InvalidTier(i16),

    #[error("Permissions {excess:?} exceed the ceiling of tier {tier}")]
    PermissionExceedsTier { tier: Tier, excess: Permissions },

    #[error("Role name \"@everyone\" is reserved")]
    ReservedRoleName,

    #[error("Conflicting override: {0}")]
    ConflictingOverride(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Missing permission: {0}")]
    MissingPermission(String),

    #[error("Missing MANAGE_ROLES permission")]
    MissingManageRolesPermission,

    #[error("Tier {actor} cannot manage roles of tier {target}")]
    InsufficientTierAuthority { actor: Tier, target: Tier },

    #[error("The @everyone role cannot be renamed or moved to another tier")]
    EveryoneRoleImmutable,

    #[error("Cannot delete @everyone role")]
    CannotDeleteEveryone,

    #[error("The @everyone role is assigned automatically")]
    EveryoneAutoAssigned,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Role name already in use: {0}")]
    DuplicateRoleName(String),

    #[error("Already a member of this program")]
    AlreadyMember,

    #[error("Member already has this role")]
    AlreadyAssigned,

    #[error("Member does not have this role")]
    NotAssigned,

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Cannot leave owned program (transfer ownership first)")]
    CannotLeaveOwnedProgram,

    // =========================================================================
    // Infrastructure Errors (passed through)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ProgramNotFound(_) => "UNKNOWN_PROGRAM",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",
            Self::OverrideNotFound => "UNKNOWN_OVERRIDE",
            Self::NotAMember => "NOT_A_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnknownPermission(_) => "UNKNOWN_PERMISSION",
            Self::InvalidTier(_) => "INVALID_TIER",
            Self::PermissionExceedsTier { .. } => "PERMISSION_EXCEEDS_TIER",
            Self::ReservedRoleName => "RESERVED_ROLE_NAME",
            Self::ConflictingOverride(_) => "CONFLICTING_OVERRIDE",

            // Authorization
            Self::MissingPermission(_) => "MISSING_PERMISSIONS",
            Self::MissingManageRolesPermission => "MISSING_MANAGE_ROLES",
            Self::InsufficientTierAuthority { .. } => "INSUFFICIENT_TIER_AUTHORITY",
            Self::EveryoneRoleImmutable => "EVERYONE_ROLE_IMMUTABLE",
            Self::CannotDeleteEveryone => "CANNOT_DELETE_EVERYONE",
            Self::EveryoneAutoAssigned => "EVERYONE_AUTO_ASSIGNED",

            // Conflict
            Self::DuplicateRoleName(_) => "DUPLICATE_ROLE_NAME",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyAssigned => "ALREADY_ASSIGNED",
            Self::NotAssigned => "NOT_ASSIGNED",

            // Business Rules
            Self::CannotLeaveOwnedProgram => "CANNOT_LEAVE_OWNED_PROGRAM",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ProgramNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::RoleNotFound(_)
                | Self::OverrideNotFound
                | Self::NotAMember
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::UnknownPermission(_)
                | Self::InvalidTier(_)
                | Self::PermissionExceedsTier { .. }
                | Self::ReservedRoleName
                | Self::ConflictingOverride(_)
                | Self::CannotLeaveOwnedProgram
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::MissingPermission(_)
                | Self::MissingManageRolesPermission
                | Self::InsufficientTierAuthority { .. }
                | Self::EveryoneRoleImmutable
                | Self::CannotDeleteEveryone
                | Self::EveryoneAutoAssigned
        )
    }

    /// Check if this is a conflict error
    ///
    /// `AlreadyAssigned` and `NotAssigned` are reported here; callers may
    /// treat them as idempotent success.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRoleName(_) | Self::AlreadyMember | Self::AlreadyAssigned | Self::NotAssigned
        )
    }

    /// Infrastructure failures passed through from storage
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }
}
