//! Service context - dependency container for services
//!
//! Holds the repositories, the ID generator, and the authority cache shared
//! by every service.

use std::sync::Arc;

use authz_common::AppConfig;
use authz_core::traits::{
    ChannelRepository, MembershipRepository, OverrideRepository, ProgramRepository, RoleRepository,
    UserRepository,
};
use authz_core::{DomainEvent, Snowflake, SnowflakeGenerator};
use tracing::debug;

use super::cache::AuthorityCache;
use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    program_repo: Arc<dyn ProgramRepository>,
    membership_repo: Arc<dyn MembershipRepository>,
    role_repo: Arc<dyn RoleRepository>,
    channel_repo: Arc<dyn ChannelRepository>,
    override_repo: Arc<dyn OverrideRepository>,

    snowflake_generator: Arc<SnowflakeGenerator>,
    authority_cache: Arc<AuthorityCache>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        program_repo: Arc<dyn ProgramRepository>,
        membership_repo: Arc<dyn MembershipRepository>,
        role_repo: Arc<dyn RoleRepository>,
        channel_repo: Arc<dyn ChannelRepository>,
        override_repo: Arc<dyn OverrideRepository>,
        snowflake_generator: Arc<SnowflakeGenerator>,
        authority_cache: Arc<AuthorityCache>,
    ) -> Self {
        Self {
            user_repo,
            program_repo,
            membership_repo,
            role_repo,
            channel_repo,
            override_repo,
            snowflake_generator,
            authority_cache,
        }
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn program_repo(&self) -> &dyn ProgramRepository {
        self.program_repo.as_ref()
    }

    pub fn membership_repo(&self) -> &dyn MembershipRepository {
        self.membership_repo.as_ref()
    }

    pub fn role_repo(&self) -> &dyn RoleRepository {
        self.role_repo.as_ref()
    }

    pub fn channel_repo(&self) -> &dyn ChannelRepository {
        self.channel_repo.as_ref()
    }

    pub fn override_repo(&self) -> &dyn OverrideRepository {
        self.override_repo.as_ref()
    }

    // === Services ===

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }

    pub fn authority_cache(&self) -> &AuthorityCache {
        self.authority_cache.as_ref()
    }

    /// Record a committed change
    ///
    /// Logs the event and drops every cached authority it makes stale.
    pub fn publish(&self, event: &DomainEvent) {
        let invalidation = event.invalidation();
        debug!(
            event_type = event.event_type(),
            program_id = %event.program_id(),
            invalidation = ?invalidation,
            "Domain event"
        );
        self.authority_cache.apply(invalidation);
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("worker_id", &self.snowflake_generator.worker_id())
            .field("authority_cache", &self.authority_cache)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    program_repo: Option<Arc<dyn ProgramRepository>>,
    membership_repo: Option<Arc<dyn MembershipRepository>>,
    role_repo: Option<Arc<dyn RoleRepository>>,
    channel_repo: Option<Arc<dyn ChannelRepository>>,
    override_repo: Option<Arc<dyn OverrideRepository>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    authority_cache: Option<Arc<AuthorityCache>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ID generator and authority cache from application config
    pub fn config(self, config: &AppConfig) -> Self {
        self.snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
            .authority_cache(Arc::new(AuthorityCache::from_config(&config.authority_cache)))
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn program_repo(mut self, repo: Arc<dyn ProgramRepository>) -> Self {
        self.program_repo = Some(repo);
        self
    }

    pub fn membership_repo(mut self, repo: Arc<dyn MembershipRepository>) -> Self {
        self.membership_repo = Some(repo);
        self
    }

    pub fn role_repo(mut self, repo: Arc<dyn RoleRepository>) -> Self {
        self.role_repo = Some(repo);
        self
    }

    pub fn channel_repo(mut self, repo: Arc<dyn ChannelRepository>) -> Self {
        self.channel_repo = Some(repo);
        self
    }

    pub fn override_repo(mut self, repo: Arc<dyn OverrideRepository>) -> Self {
        self.override_repo = Some(repo);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn authority_cache(mut self, cache: Arc<AuthorityCache>) -> Self {
        self.authority_cache = Some(cache);
        self
    }

    /// Build the ServiceContext
    ///
    /// The generator defaults to worker 0 and the cache to disabled.
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.program_repo.ok_or_else(|| ServiceError::validation("program_repo is required"))?,
            self.membership_repo.ok_or_else(|| ServiceError::validation("membership_repo is required"))?,
            self.role_repo.ok_or_else(|| ServiceError::validation("role_repo is required"))?,
            self.channel_repo.ok_or_else(|| ServiceError::validation("channel_repo is required"))?,
            self.override_repo.ok_or_else(|| ServiceError::validation("override_repo is required"))?,
            self.snowflake_generator.unwrap_or_default(),
            self.authority_cache.unwrap_or_default(),
        ))
    }
}
