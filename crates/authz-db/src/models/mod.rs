//! Database models - SQLx-compatible structs for PostgreSQL tables

mod channel;
mod membership;
mod permission_override;
mod program;
mod role;
mod user;

pub use channel::ChannelModel;
pub use membership::MembershipModel;
pub use permission_override::OverrideModel;
pub use program::ProgramModel;
pub use role::RoleModel;
pub use user::UserModel;
