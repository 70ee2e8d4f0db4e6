//! # authz-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `authz-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations, with multi-row provisioning in one
//!   transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use authz_common::AppConfig;
//! use authz_db::{create_pool, run_migrations, PoolConfig, PgRoleRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let pool = create_pool(&PoolConfig::from(&config.database)).await?;
//!     run_migrations(&pool).await?;
//!     let role_repo = PgRoleRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, run_migrations_from, PoolConfig, PgPool};
pub use repositories::{
    PgChannelRepository, PgMembershipRepository, PgOverrideRepository, PgProgramRepository,
    PgRoleRepository, PgUserRepository,
};
