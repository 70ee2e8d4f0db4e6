//! Authority service
//!
//! Resolves a user's base tier and permissions in a program, consulting the
//! authority cache when it is enabled.

use authz_core::{Authority, DomainError, Snowflake};
use tracing::{debug, instrument};

use crate::dto::AuthorityResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authority resolution service
pub struct AuthorityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthorityService<'a> {
    /// Create a new AuthorityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve `(user, program)` to a tier and permission set
    ///
    /// Fails with `ProgramNotFound`, `UserNotFound`, or `NotAMember`.
    #[instrument(skip(self))]
    pub async fn resolve_authority(
        &self,
        user_id: Snowflake,
        program_id: Snowflake,
    ) -> ServiceResult<Authority> {
        let cache = self.ctx.authority_cache();
        if let Some(authority) = cache.get(program_id, user_id) {
            debug!(user_id = %user_id, program_id = %program_id, "Authority cache hit");
            return Ok(authority);
        }
        let generation = cache.generation(program_id);

        let program = self
            .ctx
            .program_repo()
            .find_by_id(program_id)
            .await?
            .ok_or(DomainError::ProgramNotFound(program_id))?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let membership = self
            .ctx
            .membership_repo()
            .find_with_roles(program_id, user_id)
            .await?;

        let authority = Authority::resolve(&user, &program, membership.as_ref())?;

        debug!(
            user_id = %user_id,
            program_id = %program_id,
            tier = %authority.tier,
            permissions = %authority.permissions,
            source = ?authority.source,
            "Authority resolved"
        );

        if cache.is_enabled() && !cache.insert(&authority, generation) {
            debug!(
                user_id = %user_id,
                program_id = %program_id,
                "Program invalidated during resolution, result not cached"
            );
        }
        Ok(authority)
    }

    /// Resolved authority as a response DTO
    #[instrument(skip(self))]
    pub async fn get_authority(
        &self,
        user_id: Snowflake,
        program_id: Snowflake,
    ) -> ServiceResult<AuthorityResponse> {
        let authority = self.resolve_authority(user_id, program_id).await?;
        Ok(AuthorityResponse::from(authority))
    }
}
