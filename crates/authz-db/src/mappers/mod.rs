//! Entity to model mappers
//!
//! Conversions from database models to domain entities (authz-core).
//! Rows that cannot represent a valid entity (unknown tier, unknown override
//! scope) convert through `TryFrom` and surface as `DomainError`.

mod channel;
mod membership;
mod permission_override;
mod program;
mod role;
mod user;

pub use membership::member_with_roles;
pub use permission_override::overrides_from_models;
pub use role::roles_from_models;
