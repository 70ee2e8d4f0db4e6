//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Multi-row writes documented as atomic must
//! run in a single storage transaction.

use async_trait::async_trait;

use crate::entities::{
    Channel, MemberRoles, Membership, OverrideScope, OverrideTarget, PermissionOverride, Program,
    Role, User,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Create a new user
    async fn create(&self, user: &User) -> RepoResult<()>;
}

// ============================================================================
// Program Repository
// ============================================================================

#[async_trait]
pub trait ProgramRepository: Send + Sync {
    /// Find program by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Program>>;

    /// Create a program with its `@everyone` role and the owner's membership
    ///
    /// Atomic: either all three records exist afterwards or none do. The
    /// owner's membership holds `everyone`.
    async fn create_with_owner(
        &self,
        program: &Program,
        everyone: &Role,
        owner_membership: &Membership,
    ) -> RepoResult<()>;

    /// Delete a program and everything scoped to it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Membership Repository
// ============================================================================

#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find membership by program and user ID
    async fn find(&self, program_id: Snowflake, user_id: Snowflake)
        -> RepoResult<Option<Membership>>;

    /// Find membership together with every assigned role
    async fn find_with_roles(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRoles>>;

    /// Create a membership holding the program's `@everyone` role
    ///
    /// Atomic. Fails with `AlreadyMember` if the user already belongs.
    async fn create(&self, membership: &Membership, everyone_role_id: Snowflake) -> RepoResult<()>;

    /// Remove a membership, its role assignments, and its user-keyed
    /// overrides in the program
    async fn delete(&self, program_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Assign a role; fails with `AlreadyAssigned` if held
    async fn add_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()>;

    /// Revoke a role; fails with `NotAssigned` if not held
    ///
    /// The `@everyone` assignment is never removed here.
    async fn remove_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Role Repository
// ============================================================================

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>>;

    /// List all roles in a program (most authoritative tier first)
    async fn find_by_program(&self, program_id: Snowflake) -> RepoResult<Vec<Role>>;

    /// Find the @everyone role for a program
    async fn find_everyone(&self, program_id: Snowflake) -> RepoResult<Option<Role>>;

    /// Create a new role; fails with `DuplicateRoleName` on a name clash
    async fn create(&self, role: &Role) -> RepoResult<()>;

    /// Update an existing role
    async fn update(&self, role: &Role) -> RepoResult<()>;

    /// Delete a role with its assignments and role-keyed overrides
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Channel Repository
// ============================================================================

#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// Find channel by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Channel>>;

    /// List all channels and categories in a program
    async fn find_by_program(&self, program_id: Snowflake) -> RepoResult<Vec<Channel>>;

    /// Create a new channel or category
    async fn create(&self, channel: &Channel) -> RepoResult<()>;

    /// Delete a channel; its overrides go with it
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Override Repository
// ============================================================================

#[async_trait]
pub trait OverrideRepository: Send + Sync {
    /// All overrides on one channel or category
    async fn find_by_scope(&self, scope: OverrideScope) -> RepoResult<Vec<PermissionOverride>>;

    /// The override for `(scope, target)`, if any
    async fn find(
        &self,
        scope: OverrideScope,
        target: OverrideTarget,
    ) -> RepoResult<Option<PermissionOverride>>;

    /// Insert or replace the override for `(scope, target)`
    ///
    /// Returns the stored record; an existing record keeps its ID.
    async fn upsert(&self, ovr: &PermissionOverride) -> RepoResult<PermissionOverride>;

    /// Delete the override for `(scope, target)`; fails with `OverrideNotFound`
    async fn delete(&self, scope: OverrideScope, target: OverrideTarget) -> RepoResult<()>;
}
