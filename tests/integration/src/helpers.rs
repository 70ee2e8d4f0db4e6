//! Test helpers for PostgreSQL-backed runs
//!
//! These require `DATABASE_URL`; callers skip when it is unset.

use std::sync::Arc;

use anyhow::Result;
use authz_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use authz_db::{
    create_pool, run_migrations, PoolConfig, PgChannelRepository, PgMembershipRepository,
    PgOverrideRepository, PgPool, PgProgramRepository, PgRoleRepository, PgUserRepository,
};
use authz_service::{ServiceContext, ServiceContextBuilder};

/// Check whether a database is configured
pub fn check_test_env() -> bool {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }
    true
}

/// Connect and migrate using the environment's configuration
pub async fn test_pool() -> Result<(AppConfig, PgPool)> {
    let config = AppConfig::from_env()?;
    // Another test may already have installed a subscriber
    let _ = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env));
    let pool = create_pool(&PoolConfig::from(&config.database)).await?;
    run_migrations(&pool).await?;
    Ok((config, pool))
}

/// Service context over PostgreSQL repositories
pub fn pg_context(config: &AppConfig, pool: &PgPool) -> Result<ServiceContext> {
    let ctx = ServiceContextBuilder::new()
        .config(config)
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .program_repo(Arc::new(PgProgramRepository::new(pool.clone())))
        .membership_repo(Arc::new(PgMembershipRepository::new(pool.clone())))
        .role_repo(Arc::new(PgRoleRepository::new(pool.clone())))
        .channel_repo(Arc::new(PgChannelRepository::new(pool.clone())))
        .override_repo(Arc::new(PgOverrideRepository::new(pool.clone())))
        .build()?;
    Ok(ctx)
}
