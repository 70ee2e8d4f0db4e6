//! End-to-end authorization scenarios over the in-memory store
//!
//! Run with: cargo test -p integration-tests --test scenarios

use authz_core::entities::{OverrideScope, OverrideTarget};
use authz_core::{DomainError, Permissions, Tier};
use authz_service::dto::{PermissionsInput, SetOverrideRequest, UpdateRoleRequest};
use authz_service::AuthorityService;
use integration_tests::{role_request, TestWorld};

fn bits(permissions: Permissions) -> Option<PermissionsInput> {
    Some(PermissionsInput::Bits(permissions.bits().to_string()))
}

// ============================================================================
// Role ceilings
// ============================================================================

#[tokio::test]
async fn test_member_tier_role_cannot_carry_manage_roles() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;

    let err = world
        .roles()
        .create_role(
            program.id,
            owner,
            role_request("Helpers", Tier::Member, Permissions::MANAGE_ROLES),
        )
        .await
        .unwrap_err();

    match err.as_domain() {
        Some(DomainError::PermissionExceedsTier { tier, excess }) => {
            assert_eq!(*tier, Tier::Member);
            assert_eq!(*excess, Permissions::MANAGE_ROLES);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(world.store.role_count(), 1);
}

// ============================================================================
// Tier authority
// ============================================================================

#[tokio::test]
async fn test_moderator_cannot_delete_admin_role() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let moderator = world.member(program, "mod").await;

    let admins = world
        .role(program, owner, "Admins", Tier::Admin, Permissions::MANAGE_CHANNELS)
        .await;
    world
        .grant(program, owner, moderator, "Mods", Tier::Moderator, Permissions::MANAGE_ROLES)
        .await;

    let err = world
        .roles()
        .delete_role(program, admins, moderator)
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InsufficientTierAuthority {
            actor: Tier::Moderator,
            target: Tier::Admin,
        })
    ));
    assert_eq!(err.status_code(), 403);
}

// ============================================================================
// Authority resolution
// ============================================================================

#[tokio::test]
async fn test_authority_is_minimum_tier_and_union_of_permissions() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let member = world.member(program.id, "alice").await;

    world
        .roles()
        .update_role(
            program.id,
            program.everyone_role_id,
            owner,
            UpdateRoleRequest {
                permissions: bits(Permissions::VIEW_CHANNELS),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap();
    world
        .grant(
            program.id,
            owner,
            member,
            "Mods",
            Tier::Moderator,
            Permissions::VIEW_CHANNELS | Permissions::SEND_MESSAGES,
        )
        .await;

    let authority = AuthorityService::new(&world.ctx)
        .resolve_authority(member, program.id)
        .await
        .unwrap();

    assert_eq!(authority.tier, Tier::Moderator);
    assert_eq!(
        authority.permissions,
        Permissions::VIEW_CHANNELS | Permissions::SEND_MESSAGES
    );
    assert_eq!(authority.role_ids.len(), 2);
}

// ============================================================================
// Channel overrides
// ============================================================================

#[tokio::test]
async fn test_channel_role_deny_removes_send() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let member = world.member(program.id, "alice").await;
    let channel = world.channel(program.id, None).await;

    world
        .overrides()
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            OverrideTarget::Role(program.everyone_role_id),
            SetOverrideRequest {
                allow: None,
                deny: Some(PermissionsInput::Names(vec!["SEND_MESSAGES".to_string()])),
            },
        )
        .await
        .unwrap();

    let permissions = world
        .permissions()
        .resolve_channel_permissions(program.id, member, channel)
        .await
        .unwrap();

    assert!(!permissions.contains(Permissions::SEND_MESSAGES));
    assert!(permissions.contains(Permissions::VIEW_CHANNELS));
    assert_eq!(permissions, Permissions::DEFAULT - Permissions::SEND_MESSAGES);

    let err = world
        .permissions()
        .require_channel_permission(program.id, member, channel, Permissions::SEND_MESSAGES)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "MISSING_PERMISSIONS");
}

// ============================================================================
// @everyone immutability
// ============================================================================

#[tokio::test]
async fn test_everyone_cannot_be_renamed() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;

    let err = world
        .roles()
        .update_role(
            program.id,
            program.everyone_role_id,
            owner,
            UpdateRoleRequest {
                name: Some("General Member".to_string()),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err.as_domain(), Some(DomainError::EveryoneRoleImmutable)));

    let everyone = world
        .roles()
        .get_role(program.id, program.everyone_role_id, owner)
        .await
        .unwrap();
    assert_eq!(everyone.name, "@everyone");
}
