//! Permission service
//!
//! Handles permission checking and computation for program members, at
//! program level and inside channels.

use authz_core::entities::{Channel, OverrideScope};
use authz_core::{Authority, ChannelOverrides, DomainError, OverrideResolver, Permissions, Snowflake};
use tracing::{debug, instrument};

use super::authority::AuthorityService;
use super::context::ServiceContext;
use super::error::ServiceResult;

/// Permission service for access control
pub struct PermissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PermissionService<'a> {
    /// Create a new PermissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if a user has a specific permission in a program
    #[instrument(skip(self))]
    pub async fn check_permission(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<bool> {
        let authority = AuthorityService::new(self.ctx)
            .resolve_authority(user_id, program_id)
            .await?;
        Ok(authority.has(permission))
    }

    /// Check permission and return error if denied
    #[instrument(skip(self))]
    pub async fn require_permission(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<()> {
        if !self.check_permission(program_id, user_id, permission).await? {
            return Err(missing(permission).into());
        }
        Ok(())
    }

    /// Effective permissions of a user inside one channel
    ///
    /// Applies the channel's overrides over those of its parent category,
    /// on top of the user's base authority.
    #[instrument(skip(self))]
    pub async fn resolve_channel_permissions(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<Permissions> {
        let authority = AuthorityService::new(self.ctx)
            .resolve_authority(user_id, program_id)
            .await?;
        let channel = self.find_channel(program_id, channel_id).await?;
        let permissions = self.apply_overrides(&authority, &channel).await?;

        debug!(
            user_id = %user_id,
            channel_id = %channel_id,
            permissions = %permissions,
            "Channel permissions resolved"
        );

        Ok(permissions)
    }

    /// Check if a user has a specific permission in a channel
    #[instrument(skip(self))]
    pub async fn check_channel_permission(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<bool> {
        let permissions = self
            .resolve_channel_permissions(program_id, user_id, channel_id)
            .await?;
        Ok(permissions.has_all(permission))
    }

    /// Check channel permission and return error if denied
    #[instrument(skip(self))]
    pub async fn require_channel_permission(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
        channel_id: Snowflake,
        permission: Permissions,
    ) -> ServiceResult<()> {
        if !self
            .check_channel_permission(program_id, user_id, channel_id, permission)
            .await?
        {
            return Err(missing(permission).into());
        }
        Ok(())
    }

    /// Load a channel, treating one from another program as missing
    pub(crate) async fn find_channel(
        &self,
        program_id: Snowflake,
        channel_id: Snowflake,
    ) -> ServiceResult<Channel> {
        self.ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .filter(|channel| channel.program_id == program_id)
            .ok_or_else(|| DomainError::ChannelNotFound(channel_id).into())
    }

    async fn apply_overrides(
        &self,
        authority: &Authority,
        channel: &Channel,
    ) -> ServiceResult<Permissions> {
        // Administrators skip the override lookups entirely
        if authority.permissions.is_administrator() {
            return Ok(Permissions::ALL);
        }

        let scope = if channel.is_category() {
            OverrideScope::Category(channel.id)
        } else {
            OverrideScope::Channel(channel.id)
        };
        let own = self.ctx.override_repo().find_by_scope(scope).await?;

        let parent = match channel.category_id {
            Some(category_id) if !channel.is_category() => {
                self.ctx
                    .override_repo()
                    .find_by_scope(OverrideScope::Category(category_id))
                    .await?
            }
            _ => Vec::new(),
        };

        let overrides = if channel.is_category() {
            ChannelOverrides {
                channel: &[],
                category: &own,
            }
        } else {
            ChannelOverrides {
                channel: &own,
                category: &parent,
            }
        };

        Ok(OverrideResolver::resolve(authority, overrides))
    }
}

fn missing(permission: Permissions) -> DomainError {
    DomainError::MissingPermission(permission.to_names().join(", "))
}
