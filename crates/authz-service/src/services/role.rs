//! Role service
//!
//! Handles role creation, editing, deletion, and assignment. Every request
//! is authorized by [`RoleMutationGuard`] against the actor's resolved
//! authority before anything is written.

use authz_core::entities::{MemberRoles, Role};
use authz_core::{
    Authority, DomainError, DomainEvent, Permissions, RoleChanges, RoleDraft, RoleMutationGuard,
    Snowflake,
};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateRoleRequest, RoleResponse, UpdateRoleRequest};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Role service
pub struct RoleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleService<'a> {
    /// Create a new RoleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new role
    #[instrument(skip(self, request))]
    pub async fn create_role(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
        request: CreateRoleRequest,
    ) -> ServiceResult<RoleResponse> {
        request.validate()?;

        let actor = self.authority(actor_id, program_id).await?;
        let permissions = match &request.permissions {
            Some(input) => input.resolve()?,
            None => Permissions::empty(),
        };

        let existing = self.ctx.role_repo().find_by_program(program_id).await?;
        let draft = RoleDraft::new(request.name, request.tier, permissions);
        RoleMutationGuard::check_create(&actor, &draft, &existing)
            .map_err(|e| rejected(&actor, "create_role", e))?;

        let mut role = Role::new(
            self.ctx.generate_id(),
            program_id,
            draft.name,
            draft.tier,
            draft.permissions,
        );
        role.set_color(request.color);
        role.set_hoisted(request.hoist);
        role.set_mentionable(request.mentionable);

        self.ctx.role_repo().create(&role).await?;

        info!(
            role_id = %role.id,
            program_id = %program_id,
            actor_id = %actor_id,
            tier = %role.tier,
            permissions = %role.permissions,
            "Role created"
        );
        self.ctx
            .publish(&DomainEvent::role_created(program_id, role.id, actor_id));

        Ok(RoleResponse::from(&role))
    }

    /// Get role by ID; the caller must belong to the program
    #[instrument(skip(self))]
    pub async fn get_role(
        &self,
        program_id: Snowflake,
        role_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<RoleResponse> {
        self.authority(actor_id, program_id).await?;
        let role = self.find_role(program_id, role_id).await?;
        Ok(RoleResponse::from(&role))
    }

    /// All roles in a program, most authoritative tier first
    #[instrument(skip(self))]
    pub async fn list_roles(
        &self,
        program_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<Vec<RoleResponse>> {
        self.authority(actor_id, program_id).await?;
        let roles = self.ctx.role_repo().find_by_program(program_id).await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    /// Roles held by `user_id`, including `@everyone`
    #[instrument(skip(self))]
    pub async fn member_roles(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<Vec<RoleResponse>> {
        self.authority(actor_id, program_id).await?;
        let member = self.find_member(program_id, user_id).await?;
        Ok(member.roles.iter().map(RoleResponse::from).collect())
    }

    /// Update role
    #[instrument(skip(self, request))]
    pub async fn update_role(
        &self,
        program_id: Snowflake,
        role_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateRoleRequest,
    ) -> ServiceResult<RoleResponse> {
        request.validate()?;

        let actor = self.authority(actor_id, program_id).await?;
        let mut role = self.find_role(program_id, role_id).await?;

        let changes = RoleChanges {
            name: request.name,
            tier: request.tier,
            permissions: request
                .permissions
                .as_ref()
                .map(crate::dto::PermissionsInput::resolve)
                .transpose()?,
        };

        let existing = self.ctx.role_repo().find_by_program(program_id).await?;
        RoleMutationGuard::check_update(&actor, &role, &changes, &existing)
            .map_err(|e| rejected(&actor, "update_role", e))?;

        let cosmetic =
            request.color.is_some() || request.hoist.is_some() || request.mentionable.is_some();
        if changes.is_empty() && !cosmetic {
            return Ok(RoleResponse::from(&role));
        }

        changes.apply(&mut role);
        if let Some(color) = request.color {
            role.set_color(color);
        }
        if let Some(hoist) = request.hoist {
            role.set_hoisted(hoist);
        }
        if let Some(mentionable) = request.mentionable {
            role.set_mentionable(mentionable);
        }

        self.ctx.role_repo().update(&role).await?;

        info!(
            role_id = %role_id,
            program_id = %program_id,
            actor_id = %actor_id,
            tier = %role.tier,
            permissions = %role.permissions,
            "Role updated"
        );
        self.ctx
            .publish(&DomainEvent::role_updated(program_id, role_id, actor_id));

        Ok(RoleResponse::from(&role))
    }

    /// Delete role along with its assignments and overrides
    #[instrument(skip(self))]
    pub async fn delete_role(
        &self,
        program_id: Snowflake,
        role_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        let actor = self.authority(actor_id, program_id).await?;
        let role = self.find_role(program_id, role_id).await?;

        RoleMutationGuard::check_delete(&actor, &role)
            .map_err(|e| rejected(&actor, "delete_role", e))?;

        self.ctx.role_repo().delete(role_id).await?;

        info!(role_id = %role_id, program_id = %program_id, actor_id = %actor_id, "Role deleted");
        self.ctx
            .publish(&DomainEvent::role_deleted(program_id, role_id, actor_id));

        Ok(())
    }

    /// Grant a role to a member
    #[instrument(skip(self))]
    pub async fn assign_role(
        &self,
        program_id: Snowflake,
        role_id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        let actor = self.authority(actor_id, program_id).await?;
        let role = self.find_role(program_id, role_id).await?;
        let member = self.find_member(program_id, user_id).await?;

        RoleMutationGuard::check_assign(&actor, &role, &member)
            .map_err(|e| rejected(&actor, "assign_role", e))?;

        self.ctx
            .membership_repo()
            .add_role(member.membership.id, role_id)
            .await?;

        info!(
            role_id = %role_id,
            user_id = %user_id,
            program_id = %program_id,
            actor_id = %actor_id,
            "Role assigned"
        );
        self.ctx.publish(&DomainEvent::role_assigned(
            program_id, role_id, user_id, actor_id,
        ));

        Ok(())
    }

    /// Revoke a role from a member
    #[instrument(skip(self))]
    pub async fn unassign_role(
        &self,
        program_id: Snowflake,
        role_id: Snowflake,
        user_id: Snowflake,
        actor_id: Snowflake,
    ) -> ServiceResult<()> {
        let actor = self.authority(actor_id, program_id).await?;
        let role = self.find_role(program_id, role_id).await?;
        let member = self.find_member(program_id, user_id).await?;

        RoleMutationGuard::check_unassign(&actor, &role, &member)
            .map_err(|e| rejected(&actor, "unassign_role", e))?;

        self.ctx
            .membership_repo()
            .remove_role(member.membership.id, role_id)
            .await?;

        info!(
            role_id = %role_id,
            user_id = %user_id,
            program_id = %program_id,
            actor_id = %actor_id,
            "Role unassigned"
        );
        self.ctx.publish(&DomainEvent::role_unassigned(
            program_id, role_id, user_id, actor_id,
        ));

        Ok(())
    }

    async fn authority(&self, user_id: Snowflake, program_id: Snowflake) -> ServiceResult<Authority> {
        AuthorityService::new(self.ctx)
            .resolve_authority(user_id, program_id)
            .await
    }

    /// Load a role, treating one from another program as missing
    async fn find_role(&self, program_id: Snowflake, role_id: Snowflake) -> ServiceResult<Role> {
        self.ctx
            .role_repo()
            .find_by_id(role_id)
            .await?
            .filter(|role| role.program_id == program_id)
            .ok_or_else(|| DomainError::RoleNotFound(role_id).into())
    }

    async fn find_member(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<MemberRoles> {
        self.ctx
            .membership_repo()
            .find_with_roles(program_id, user_id)
            .await?
            .ok_or_else(|| DomainError::NotAMember.into())
    }
}

/// Log a guard rejection and lift it into a service error
fn rejected(actor: &Authority, action: &'static str, err: DomainError) -> ServiceError {
    warn!(
        user_id = %actor.user_id,
        program_id = %actor.program_id,
        tier = %actor.tier,
        action,
        code = err.code(),
        "Role mutation rejected"
    );
    err.into()
}
