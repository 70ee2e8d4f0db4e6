//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in authz-core.
//! Each repository handles database operations for a specific domain entity.

mod channel;
mod error;
mod membership;
mod permission_override;
mod program;
mod role;
mod user;

pub use channel::PgChannelRepository;
pub use membership::PgMembershipRepository;
pub use permission_override::PgOverrideRepository;
pub use program::PgProgramRepository;
pub use role::PgRoleRepository;
pub use user::PgUserRepository;
