//! # authz-service
//!
//! Application layer: authority resolution, channel permission checks, role
//! and override management, and program membership, on top of the
//! repository ports from `authz-core`.

pub mod dto;
pub mod services;

pub use services::{
    AuthorityCache, AuthorityService, OverrideService, PermissionService, ProgramService,
    RoleService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
