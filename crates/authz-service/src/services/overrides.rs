//! Permission override service
//!
//! Sets, removes, and lists channel and category overrides.

use authz_core::entities::{OverrideScope, OverrideTarget, PermissionOverride};
use authz_core::{Authority, DomainError, DomainEvent, OverrideGuard, Snowflake};
use tracing::{info, instrument, warn};

use crate::dto::{OverrideResponse, SetOverrideRequest};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::permission::PermissionService;

/// Override service
pub struct OverrideService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OverrideService<'a> {
    /// Create a new OverrideService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create or replace the override for `(scope, target)`
    #[instrument(skip(self, request))]
    pub async fn set_override(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
        request: SetOverrideRequest,
    ) -> ServiceResult<OverrideResponse> {
        let actor = self.authority(actor_id, program_id).await?;
        let (allow, deny) = request.resolve()?;

        OverrideGuard::check_set(&actor, allow, deny)
            .map_err(|e| rejected(&actor, "set_override", e))?;
        self.check_scope(program_id, scope).await?;
        self.check_target(program_id, target).await?;

        let stored = self
            .ctx
            .override_repo()
            .upsert(&PermissionOverride::new(
                self.ctx.generate_id(),
                scope,
                target,
                allow,
                deny,
            ))
            .await?;

        info!(
            override_id = %stored.id,
            scope = ?scope,
            target = ?target,
            allow = %allow,
            deny = %deny,
            actor_id = %actor_id,
            "Permission override set"
        );
        self.ctx
            .publish(&DomainEvent::override_set(program_id, scope, target, actor_id));

        Ok(OverrideResponse::from(stored))
    }

    /// Remove the override for `(scope, target)`
    #[instrument(skip(self))]
    pub async fn delete_override(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
        scope: OverrideScope,
        target: OverrideTarget,
    ) -> ServiceResult<()> {
        let actor = self.authority(actor_id, program_id).await?;
        OverrideGuard::check_delete(&actor)
            .map_err(|e| rejected(&actor, "delete_override", e))?;
        self.check_scope(program_id, scope).await?;

        self.ctx.override_repo().delete(scope, target).await?;

        info!(scope = ?scope, target = ?target, actor_id = %actor_id, "Permission override deleted");
        self.ctx
            .publish(&DomainEvent::override_deleted(program_id, scope, target, actor_id));

        Ok(())
    }

    /// Every override on one channel or category
    #[instrument(skip(self))]
    pub async fn list_overrides(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
        scope: OverrideScope,
    ) -> ServiceResult<Vec<OverrideResponse>> {
        self.authority(actor_id, program_id).await?;
        self.check_scope(program_id, scope).await?;

        let overrides = self.ctx.override_repo().find_by_scope(scope).await?;
        Ok(overrides.into_iter().map(OverrideResponse::from).collect())
    }

    async fn authority(&self, user_id: Snowflake, program_id: Snowflake) -> ServiceResult<Authority> {
        AuthorityService::new(self.ctx)
            .resolve_authority(user_id, program_id)
            .await
    }

    /// The scope must be a channel of this program and of the matching kind
    async fn check_scope(&self, program_id: Snowflake, scope: OverrideScope) -> ServiceResult<()> {
        let channel = PermissionService::new(self.ctx)
            .find_channel(program_id, scope.id())
            .await?;
        OverrideGuard::check_scope_kind(scope, channel.is_category())?;
        Ok(())
    }

    async fn check_target(
        &self,
        program_id: Snowflake,
        target: OverrideTarget,
    ) -> ServiceResult<()> {
        match target {
            OverrideTarget::Role(role_id) => {
                self.ctx
                    .role_repo()
                    .find_by_id(role_id)
                    .await?
                    .filter(|role| role.program_id == program_id)
                    .ok_or(DomainError::RoleNotFound(role_id))?;
            }
            OverrideTarget::User(user_id) => {
                self.ctx
                    .user_repo()
                    .find_by_id(user_id)
                    .await?
                    .ok_or(DomainError::UserNotFound(user_id))?;
            }
        }
        Ok(())
    }
}

fn rejected(actor: &Authority, action: &'static str, err: DomainError) -> ServiceError {
    warn!(
        user_id = %actor.user_id,
        program_id = %actor.program_id,
        action,
        code = err.code(),
        "Override change rejected"
    );
    err.into()
}
