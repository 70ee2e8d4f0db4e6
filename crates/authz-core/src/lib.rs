//! # authz-core
//!
//! Domain layer of the program authorization engine: the permission catalog,
//! authority tiers, entities, policy algorithms, repository traits, and
//! domain events. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod policy;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Channel, ChannelKind, MemberRoles, Membership, OverrideScope, OverrideTarget,
    PermissionOverride, Program, Role, User,
};
pub use error::DomainError;
pub use events::{DomainEvent, Invalidation};
pub use policy::{
    validate_permission_names, Authority, AuthoritySource, ChannelOverrides, OverrideGuard,
    OverrideResolver, RoleChanges, RoleDraft, RoleMutationGuard,
};
pub use traits::{
    ChannelRepository, MembershipRepository, OverrideRepository, ProgramRepository, RepoResult,
    RoleRepository, UserRepository,
};
pub use value_objects::{
    Permissions, Snowflake, SnowflakeGenerator, SnowflakeParseError, Tier, TierTable,
};
