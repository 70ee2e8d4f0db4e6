//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use authz_core::{validate_permission_names, DomainError, Permissions, Tier};
use serde::Deserialize;
use validator::Validate;

/// Permission set as supplied by a caller
///
/// Either a list of catalog names or a decimal bitfield string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PermissionsInput {
    Names(Vec<String>),
    Bits(String),
}

impl PermissionsInput {
    /// Resolve to a permission set; unknown names or bits fail
    pub fn resolve(&self) -> Result<Permissions, DomainError> {
        match self {
            Self::Names(names) => validate_permission_names(names),
            Self::Bits(bits) => Permissions::parse(bits),
        }
    }
}

// ============================================================================
// Program Requests
// ============================================================================

/// Create program request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProgramRequest {
    #[validate(length(min = 1, max = 100, message = "Program name must be 1-100 characters"))]
    pub name: String,
}

// ============================================================================
// Role Requests
// ============================================================================

/// Create role request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "Role name must be 1-100 characters"))]
    pub name: String,

    /// Tier as its numeric value (0 = Owner .. 3 = Member)
    #[serde(default)]
    pub tier: Tier,

    /// Defaults to an empty set
    pub permissions: Option<PermissionsInput>,

    /// Role color as integer (RGB)
    #[serde(default)]
    pub color: i32,

    /// Whether to display role members separately
    #[serde(default)]
    pub hoist: bool,

    /// Whether the role can be mentioned
    #[serde(default)]
    pub mentionable: bool,
}

/// Update role request; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "Role name must be 1-100 characters"))]
    pub name: Option<String>,

    pub tier: Option<Tier>,

    pub permissions: Option<PermissionsInput>,

    pub color: Option<i32>,

    pub hoist: Option<bool>,

    pub mentionable: Option<bool>,
}

// ============================================================================
// Override Requests
// ============================================================================

/// Set (create or replace) override request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetOverrideRequest {
    pub allow: Option<PermissionsInput>,
    pub deny: Option<PermissionsInput>,
}

impl SetOverrideRequest {
    /// Resolve `(allow, deny)`; an absent side is empty
    pub fn resolve(&self) -> Result<(Permissions, Permissions), DomainError> {
        let side = |input: &Option<PermissionsInput>| {
            input
                .as_ref()
                .map_or(Ok(Permissions::empty()), PermissionsInput::resolve)
        };
        Ok((side(&self.allow)?, side(&self.deny)?))
    }
}
