//! Channel permission resolution with category and channel overrides
//!
//! Precedence, highest first:
//! 1. User override on the channel
//! 2. Role overrides on the channel (merged over every held role)
//! 3. User override on the parent category
//! 4. Role overrides on the parent category
//! 5. Base permissions from the user's roles
//!
//! Each layer only decides bits that no higher layer has decided. Within a
//! layer deny wins over allow. A base set containing ADMINISTRATOR skips
//! overrides entirely.

use crate::entities::{OverrideScope, OverrideTarget, PermissionOverride};
use crate::error::DomainError;
use crate::value_objects::{Permissions, Snowflake};

use super::Authority;

/// Allow/deny pair contributed by one precedence layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrideLayer {
    pub allow: Permissions,
    pub deny: Permissions,
}

impl OverrideLayer {
    /// The user-keyed override for `user_id`, if any
    pub fn for_user(overrides: &[PermissionOverride], user_id: Snowflake) -> Self {
        overrides
            .iter()
            .find(|o| o.target == OverrideTarget::User(user_id))
            .map(|o| Self {
                allow: o.effective_allow(),
                deny: o.effective_deny(),
            })
            .unwrap_or_default()
    }

    /// Role-keyed overrides merged across every held role
    ///
    /// `deny` is the union of all denies; `allow` is the union of all allows
    /// minus anything denied by any held role.
    pub fn for_roles(overrides: &[PermissionOverride], role_ids: &[Snowflake]) -> Self {
        let (allow, deny) = overrides
            .iter()
            .filter(|o| matches!(o.target, OverrideTarget::Role(id) if role_ids.contains(&id)))
            .fold((Permissions::empty(), Permissions::empty()), |(allow, deny), o| {
                (allow | o.effective_allow(), deny | o.effective_deny())
            });
        Self {
            allow: allow - deny,
            deny,
        }
    }
}

/// Override records relevant to one channel
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelOverrides<'a> {
    pub channel: &'a [PermissionOverride],
    /// Overrides on the channel's parent category (empty when uncategorized)
    pub category: &'a [PermissionOverride],
}

/// Computes final channel permissions from a base authority and overrides
pub struct OverrideResolver;

impl OverrideResolver {
    /// Effective permissions for `authority` in a channel
    pub fn resolve(authority: &Authority, overrides: ChannelOverrides<'_>) -> Permissions {
        if authority.permissions.is_administrator() {
            return Permissions::ALL;
        }

        let layers = [
            OverrideLayer::for_user(overrides.channel, authority.user_id),
            OverrideLayer::for_roles(overrides.channel, &authority.role_ids),
            OverrideLayer::for_user(overrides.category, authority.user_id),
            OverrideLayer::for_roles(overrides.category, &authority.role_ids),
        ];
        Self::apply_layers(authority.permissions, &layers)
    }

    /// Apply layers in precedence order over `base`
    pub fn apply_layers(base: Permissions, layers: &[OverrideLayer]) -> Permissions {
        let mut decided = Permissions::empty();
        let mut granted = Permissions::empty();

        for layer in layers {
            let deny = layer.deny - decided;
            let allow = layer.allow - layer.deny - decided;
            granted |= allow;
            decided |= allow | deny;
        }

        granted | (base - decided)
    }
}

/// Validation for override writes
pub struct OverrideGuard;

impl OverrideGuard {
    /// Authorize and validate setting an override
    pub fn check_set(
        actor: &Authority,
        allow: Permissions,
        deny: Permissions,
    ) -> Result<(), DomainError> {
        Self::check_manage(actor)?;

        let both = allow & deny;
        if !both.is_empty() {
            return Err(DomainError::ConflictingOverride(format!(
                "bits both allowed and denied: {}",
                both.to_names().join(", ")
            )));
        }
        if (allow | deny).contains(Permissions::ADMINISTRATOR) {
            return Err(DomainError::ConflictingOverride(
                "ADMINISTRATOR cannot be overridden".to_string(),
            ));
        }
        Ok(())
    }

    /// Authorize deleting an override
    pub fn check_delete(actor: &Authority) -> Result<(), DomainError> {
        Self::check_manage(actor)
    }

    /// A category scope must point at a category; a channel scope must not
    pub fn check_scope_kind(scope: OverrideScope, is_category: bool) -> Result<(), DomainError> {
        match (scope, is_category) {
            (OverrideScope::Channel(_), false) | (OverrideScope::Category(_), true) => Ok(()),
            (OverrideScope::Channel(_), true) => Err(DomainError::ValidationError(
                "channel-scoped override points at a category".to_string(),
            )),
            (OverrideScope::Category(_), false) => Err(DomainError::ValidationError(
                "category-scoped override points at a non-category channel".to_string(),
            )),
        }
    }

    fn check_manage(actor: &Authority) -> Result<(), DomainError> {
        actor.require_owner_or(Permissions::MANAGE_CHANNELS)
    }
}
