//! Data transfer objects for requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for caller input
//! - Response DTOs for serialized output
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    CreateProgramRequest, CreateRoleRequest, PermissionsInput, SetOverrideRequest,
    UpdateRoleRequest,
};
pub use responses::{
    AuthorityResponse, OverrideResponse, ProgramResponse, RoleResponse,
};
