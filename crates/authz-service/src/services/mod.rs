//! Application services
//!
//! Each service borrows a [`ServiceContext`], resolves the caller's authority,
//! runs the pure policy checks from `authz-core`, and only then writes through
//! the repositories.

pub mod authority;
pub mod cache;
pub mod context;
pub mod error;
pub mod overrides;
pub mod permission;
pub mod program;
pub mod role;

pub use authority::AuthorityService;
pub use cache::AuthorityCache;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use overrides::OverrideService;
pub use permission::PermissionService;
pub use program::ProgramService;
pub use role::RoleService;
