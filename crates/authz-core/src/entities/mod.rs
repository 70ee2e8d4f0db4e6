//! Domain entities - core business objects

mod channel;
mod membership;
mod permission_override;
mod program;
mod role;
mod user;

pub use channel::{Channel, ChannelKind};
pub use membership::{MemberRoles, Membership};
pub use permission_override::{OverrideScope, OverrideTarget, PermissionOverride};
pub use program::Program;
pub use role::Role;
pub use user::User;
