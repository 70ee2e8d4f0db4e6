//! Program service
//!
//! Program provisioning and membership lifecycle. A program is always created
//! together with its `@everyone` role and the owner's membership, and every
//! membership starts out holding `@everyone`.

use authz_core::entities::{Membership, Program, Role};
use authz_core::{AuthoritySource, DomainError, DomainEvent, Snowflake};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateProgramRequest, ProgramResponse};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Program service
pub struct ProgramService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProgramService<'a> {
    /// Create a new ProgramService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a program owned by `owner_id`
    #[instrument(skip(self, request))]
    pub async fn create_program(
        &self,
        owner_id: Snowflake,
        request: CreateProgramRequest,
    ) -> ServiceResult<ProgramResponse> {
        request.validate()?;

        self.ctx
            .user_repo()
            .find_by_id(owner_id)
            .await?
            .ok_or(DomainError::UserNotFound(owner_id))?;

        let program = Program::new(self.ctx.generate_id(), request.name, owner_id);
        let everyone = Role::everyone(self.ctx.generate_id(), program.id);
        let membership = Membership::new(self.ctx.generate_id(), program.id, owner_id);

        self.ctx
            .program_repo()
            .create_with_owner(&program, &everyone, &membership)
            .await?;

        info!(program_id = %program.id, owner_id = %owner_id, "Program created");
        self.ctx
            .publish(&DomainEvent::program_created(program.id, owner_id));

        Ok(ProgramResponse {
            id: program.id,
            name: program.name,
            owner_id,
            everyone_role_id: everyone.id,
            created_at: program.created_at,
        })
    }

    /// Delete a program; only its owner (or a super admin) may
    #[instrument(skip(self))]
    pub async fn delete_program(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        let actor = AuthorityService::new(self.ctx)
            .resolve_authority(actor_id, program_id)
            .await?;

        if actor.source == AuthoritySource::Member {
            warn!(
                user_id = %actor_id,
                program_id = %program_id,
                action = "delete_program",
                "Program deletion rejected"
            );
            return Err(DomainError::MissingPermission("program ownership".to_string()).into());
        }

        self.ctx.program_repo().delete(program_id).await?;

        info!(program_id = %program_id, actor_id = %actor_id, "Program deleted");
        self.ctx
            .publish(&DomainEvent::program_deleted(program_id, actor_id));

        Ok(())
    }

    /// Add `user_id` to a program with the `@everyone` role
    #[instrument(skip(self))]
    pub async fn join_program(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Membership> {
        self.find_program(program_id).await?;
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let everyone = self
            .ctx
            .role_repo()
            .find_everyone(program_id)
            .await?
            .ok_or_else(|| {
                DomainError::InternalError(format!("program {program_id} has no @everyone role"))
            })?;

        let membership = Membership::new(self.ctx.generate_id(), program_id, user_id);
        self.ctx
            .membership_repo()
            .create(&membership, everyone.id)
            .await?;

        info!(program_id = %program_id, user_id = %user_id, "Member joined");
        self.ctx
            .publish(&DomainEvent::member_joined(program_id, user_id));

        Ok(membership)
    }

    /// Remove `user_id` from a program; the owner cannot leave
    #[instrument(skip(self))]
    pub async fn leave_program(&self, program_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let program = self.find_program(program_id).await?;
        if program.is_owner(user_id) {
            return Err(DomainError::CannotLeaveOwnedProgram.into());
        }

        self.ctx
            .membership_repo()
            .find(program_id, user_id)
            .await?
            .ok_or(DomainError::NotAMember)?;
        self.ctx.membership_repo().delete(program_id, user_id).await?;

        info!(program_id = %program_id, user_id = %user_id, "Member left");
        self.ctx
            .publish(&DomainEvent::member_left(program_id, user_id));

        Ok(())
    }

    async fn find_program(&self, program_id: Snowflake) -> ServiceResult<Program> {
        Ok(self
            .ctx
            .program_repo()
            .find_by_id(program_id)
            .await?
            .ok_or(DomainError::ProgramNotFound(program_id))?)
    }
}
