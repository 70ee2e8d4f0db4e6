//! Service-level behavior over the in-memory store
//!
//! Run with: cargo test -p integration-tests --test services

use std::time::Duration;

use authz_core::entities::{OverrideScope, OverrideTarget};
use authz_core::{AuthoritySource, DomainError, Permissions, Tier};
use authz_service::dto::{CreateProgramRequest, PermissionsInput, SetOverrideRequest, UpdateRoleRequest};
use authz_service::AuthorityService;
use integration_tests::{role_request, TestWorld};

fn names(names: &[&str]) -> Option<PermissionsInput> {
    Some(PermissionsInput::Names(
        names.iter().map(|n| (*n).to_string()).collect(),
    ))
}

// ============================================================================
// Program lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_program_provisions_everyone_and_owner_membership() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;

    let roles = world.roles().member_roles(program.id, owner, owner).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].id, program.everyone_role_id);
    assert!(roles[0].is_everyone);
    assert!(world.store.everyone_invariant_holds());

    let authority = AuthorityService::new(&world.ctx)
        .get_authority(owner, program.id)
        .await
        .unwrap();
    assert_eq!(authority.tier, Tier::Owner);
    assert_eq!(authority.permissions, Permissions::ALL);
    assert_eq!(authority.source, AuthoritySource::Owner);
}

#[tokio::test]
async fn test_failed_provisioning_leaves_nothing_behind() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;

    world.store.fail_next_write();
    let err = world
        .programs()
        .create_program(owner, CreateProgramRequest { name: "Broken".to_string() })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert_eq!(world.store.program_count(), 0);
    assert_eq!(world.store.role_count(), 0);
    assert_eq!(world.store.membership_count(), 0);

    let program = world.program(owner).await.id;
    let user = world.user("alice").await;
    world.store.fail_next_write();
    assert!(world.programs().join_program(program, user).await.is_err());
    assert_eq!(world.store.membership_count(), 1);
    assert!(world.store.everyone_invariant_holds());
}

#[tokio::test]
async fn test_create_program_validates_name() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let err = world
        .programs()
        .create_program(owner, CreateProgramRequest { name: String::new() })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_join_and_leave() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;

    let err = world.programs().join_program(program, alice).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::AlreadyMember)));
    assert_eq!(err.status_code(), 409);

    let err = world.programs().leave_program(program, owner).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CannotLeaveOwnedProgram)));

    world.programs().leave_program(program, alice).await.unwrap();
    let err = AuthorityService::new(&world.ctx)
        .resolve_authority(alice, program)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotAMember)));

    let err = world.programs().leave_program(program, alice).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotAMember)));
}

#[tokio::test]
async fn test_rejoin_starts_without_user_overrides() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let channel = world.channel(program, None).await;
    let scope = OverrideScope::Channel(channel);

    world
        .overrides()
        .set_override(
            program,
            owner,
            scope,
            OverrideTarget::User(alice),
            SetOverrideRequest {
                allow: None,
                deny: names(&["VIEW_CHANNELS"]),
            },
        )
        .await
        .unwrap();
    assert!(!world
        .permissions()
        .check_channel_permission(program, alice, channel, Permissions::VIEW_CHANNELS)
        .await
        .unwrap());

    world.programs().leave_program(program, alice).await.unwrap();
    let listed = world.overrides().list_overrides(program, owner, scope).await.unwrap();
    assert!(listed.is_empty());

    world.programs().join_program(program, alice).await.unwrap();
    assert!(world
        .permissions()
        .check_channel_permission(program, alice, channel, Permissions::VIEW_CHANNELS)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_only_owner_deletes_program() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let admin = world.member(program, "admin").await;
    world
        .grant(program, owner, admin, "Admins", Tier::Admin, Permissions::MANAGE_PROGRAM)
        .await;

    let err = world.programs().delete_program(program, admin).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::MissingPermission(_))));

    world.programs().delete_program(program, owner).await.unwrap();
    assert_eq!(world.store.program_count(), 0);
    assert_eq!(world.store.role_count(), 0);
    assert_eq!(world.store.membership_count(), 0);

    let err = AuthorityService::new(&world.ctx)
        .resolve_authority(owner, program)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ProgramNotFound(_))));
}

// ============================================================================
// Authority resolution
// ============================================================================

#[tokio::test]
async fn test_super_admin_is_owner_everywhere() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let staff = world.super_admin("staff").await;

    let authority = AuthorityService::new(&world.ctx)
        .resolve_authority(staff, program)
        .await
        .unwrap();
    assert_eq!(authority.tier, Tier::Owner);
    assert_eq!(authority.permissions, Permissions::ALL);
    assert_eq!(authority.source, AuthoritySource::SuperAdmin);
    assert!(authority.role_ids.is_empty());
}

#[tokio::test]
async fn test_unknown_user_and_outsider() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let outsider = world.user("outsider").await;

    let err = AuthorityService::new(&world.ctx)
        .resolve_authority(outsider, program)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotAMember)));
    assert_eq!(err.status_code(), 404);

    let ghost = world.ctx.generate_id();
    let err = AuthorityService::new(&world.ctx)
        .resolve_authority(ghost, program)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::UserNotFound(_))));
}

#[tokio::test]
async fn test_stronger_role_never_weakens_tier() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let authority = AuthorityService::new(&world.ctx);

    assert_eq!(authority.resolve_authority(alice, program).await.unwrap().tier, Tier::Member);

    world
        .grant(program, owner, alice, "Mods", Tier::Moderator, Permissions::KICK_MEMBERS)
        .await;
    assert_eq!(
        authority.resolve_authority(alice, program).await.unwrap().tier,
        Tier::Moderator
    );

    let admins = world
        .grant(program, owner, alice, "Admins", Tier::Admin, Permissions::BAN_MEMBERS)
        .await;
    let resolved = authority.resolve_authority(alice, program).await.unwrap();
    assert_eq!(resolved.tier, Tier::Admin);
    assert!(resolved.permissions.contains(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS));

    world.roles().unassign_role(program, admins, alice, owner).await.unwrap();
    assert_eq!(
        authority.resolve_authority(alice, program).await.unwrap().tier,
        Tier::Moderator
    );
}

#[tokio::test]
async fn test_resolution_is_repeatable() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let category = world.category(program).await;
    let channel = world.channel(program, Some(category)).await;

    let first = world
        .permissions()
        .resolve_channel_permissions(program, alice, channel)
        .await
        .unwrap();
    let second = world
        .permissions()
        .resolve_channel_permissions(program, alice, channel)
        .await
        .unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Role management
// ============================================================================

#[tokio::test]
async fn test_role_names_are_checked() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    world.role(program, owner, "Mods", Tier::Moderator, Permissions::empty()).await;

    let err = world
        .roles()
        .create_role(program, owner, role_request("Mods", Tier::Member, Permissions::empty()))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::DuplicateRoleName(_))));

    // Case-sensitive
    world.role(program, owner, "mods", Tier::Member, Permissions::empty()).await;

    let err = world
        .roles()
        .create_role(program, owner, role_request("@everyone", Tier::Member, Permissions::empty()))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ReservedRoleName)));
}

#[tokio::test]
async fn test_lowering_tier_below_permissions_is_rejected() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let mods = world
        .role(program, owner, "Mods", Tier::Moderator, Permissions::KICK_MEMBERS)
        .await;

    let err = world
        .roles()
        .update_role(
            program,
            mods,
            owner,
            UpdateRoleRequest {
                tier: Some(Tier::Member),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::PermissionExceedsTier { tier: Tier::Member, .. })
    ));

    let role = world.roles().get_role(program, mods, owner).await.unwrap();
    assert_eq!(role.tier, Tier::Moderator);
    assert_eq!(role.permissions, Permissions::KICK_MEMBERS);
}

#[tokio::test]
async fn test_update_role_applies_changes() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let mods = world
        .role(program, owner, "Mods", Tier::Moderator, Permissions::KICK_MEMBERS)
        .await;

    let updated = world
        .roles()
        .update_role(
            program,
            mods,
            owner,
            UpdateRoleRequest {
                name: Some("Moderators".to_string()),
                permissions: names(&["KICK_MEMBERS", "MUTE_MEMBERS"]),
                color: Some(0x0000_ff00),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Moderators");
    assert_eq!(updated.permissions, Permissions::KICK_MEMBERS | Permissions::MUTE_MEMBERS);
    assert_eq!(updated.color, 0x0000_ff00);

    let listed = world.roles().list_roles(program, owner).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Moderators");
    assert!(listed[1].is_everyone);
}

#[tokio::test]
async fn test_unknown_permission_name_is_rejected() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let mut request = role_request("Mods", Tier::Moderator, Permissions::empty());
    request.permissions = names(&["KICK_MEMBERS", "TELEPORT"]);

    let err = world.roles().create_role(program, owner, request).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::UnknownPermission(ref n)) if n == "TELEPORT"));
}

#[tokio::test]
async fn test_member_tier_manages_nothing_and_owner_manages_owner() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;

    let err = world
        .roles()
        .create_role(program, alice, role_request("Fans", Tier::Member, Permissions::empty()))
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InsufficientTierAuthority { actor: Tier::Member, target: Tier::Member })
    ));

    world
        .role(program, owner, "Co-owners", Tier::Owner, Permissions::ALL)
        .await;
}

#[tokio::test]
async fn test_moderator_without_manage_roles() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let moderator = world.member(program, "mod").await;
    world
        .grant(program, owner, moderator, "Mods", Tier::Moderator, Permissions::KICK_MEMBERS)
        .await;

    let err = world
        .roles()
        .create_role(program, moderator, role_request("Fans", Tier::Member, Permissions::empty()))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::MissingManageRolesPermission)));

    // Assignment and deletion only need authority over the role's tier
    let fans = world.role(program, owner, "Fans", Tier::Member, Permissions::empty()).await;
    let alice = world.member(program, "alice").await;
    world.roles().assign_role(program, fans, alice, moderator).await.unwrap();
    world.roles().unassign_role(program, fans, alice, moderator).await.unwrap();
    world.roles().delete_role(program, fans, moderator).await.unwrap();
}

#[tokio::test]
async fn test_everyone_rename_needs_authority_first() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let alice = world.member(program.id, "alice").await;

    let rename = UpdateRoleRequest {
        name: Some("General".to_string()),
        ..UpdateRoleRequest::default()
    };
    let err = world
        .roles()
        .update_role(program.id, program.everyone_role_id, alice, rename.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::InsufficientTierAuthority { actor: Tier::Member, target: Tier::Member })
    ));

    let err = world
        .roles()
        .update_role(program.id, program.everyone_role_id, owner, rename)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::EveryoneRoleImmutable)));
}

#[tokio::test]
async fn test_assignment_rules() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let alice = world.member(program.id, "alice").await;
    let helpers = world
        .grant(program.id, owner, alice, "Helpers", Tier::Member, Permissions::CREATE_INVITE)
        .await;

    let err = world
        .roles()
        .assign_role(program.id, helpers, alice, owner)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::AlreadyAssigned)));

    let err = world
        .roles()
        .assign_role(program.id, program.everyone_role_id, alice, owner)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::EveryoneAutoAssigned)));

    let err = world
        .roles()
        .unassign_role(program.id, program.everyone_role_id, alice, owner)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::EveryoneAutoAssigned)));

    world.roles().unassign_role(program.id, helpers, alice, owner).await.unwrap();
    let err = world
        .roles()
        .unassign_role(program.id, helpers, alice, owner)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotAssigned)));
    assert!(world.store.everyone_invariant_holds());
}

#[tokio::test]
async fn test_everyone_cannot_be_deleted() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;

    let err = world
        .roles()
        .delete_role(program.id, program.everyone_role_id, owner)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::CannotDeleteEveryone)));
}

#[tokio::test]
async fn test_role_from_other_program_is_not_found() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let first = world.program(owner).await.id;
    let second = world.program(owner).await.id;
    let role = world.role(second, owner, "Mods", Tier::Moderator, Permissions::empty()).await;

    let err = world.roles().delete_role(first, role, owner).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::RoleNotFound(_))));
}

// ============================================================================
// Channel permissions
// ============================================================================

#[tokio::test]
async fn test_channel_deny_beats_category_allow() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let alice = world.member(program.id, "alice").await;
    let category = world.category(program.id).await;
    let channel = world.channel(program.id, Some(category)).await;
    let sibling = world.channel(program.id, Some(category)).await;
    let everyone = OverrideTarget::Role(program.everyone_role_id);

    world
        .overrides()
        .set_override(
            program.id,
            owner,
            OverrideScope::Category(category),
            everyone,
            SetOverrideRequest {
                allow: names(&["MANAGE_MESSAGES"]),
                deny: None,
            },
        )
        .await
        .unwrap();
    world
        .overrides()
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            everyone,
            SetOverrideRequest {
                allow: None,
                deny: names(&["MANAGE_MESSAGES"]),
            },
        )
        .await
        .unwrap();

    let permissions = world.permissions();
    assert!(!permissions
        .check_channel_permission(program.id, alice, channel, Permissions::MANAGE_MESSAGES)
        .await
        .unwrap());
    assert!(permissions
        .check_channel_permission(program.id, alice, sibling, Permissions::MANAGE_MESSAGES)
        .await
        .unwrap());
    assert!(!permissions
        .check_permission(program.id, alice, Permissions::MANAGE_MESSAGES)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_channel_role_deny_beats_category_user_allow() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let alice = world.member(program.id, "alice").await;
    let category = world.category(program.id).await;
    let channel = world.channel(program.id, Some(category)).await;

    world
        .overrides()
        .set_override(
            program.id,
            owner,
            OverrideScope::Category(category),
            OverrideTarget::User(alice),
            SetOverrideRequest {
                allow: names(&["ATTACH_FILES", "MENTION_EVERYONE"]),
                deny: None,
            },
        )
        .await
        .unwrap();
    world
        .overrides()
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            OverrideTarget::Role(program.everyone_role_id),
            SetOverrideRequest {
                allow: None,
                deny: names(&["ATTACH_FILES"]),
            },
        )
        .await
        .unwrap();

    let resolved = world
        .permissions()
        .resolve_channel_permissions(program.id, alice, channel)
        .await
        .unwrap();
    assert!(!resolved.contains(Permissions::ATTACH_FILES));
    assert!(resolved.contains(Permissions::MENTION_EVERYONE));
}

#[tokio::test]
async fn test_administrator_ignores_overrides() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let admin = world.member(program, "admin").await;
    let channel = world.channel(program, None).await;
    world
        .grant(program, owner, admin, "Admins", Tier::Owner, Permissions::ADMINISTRATOR)
        .await;

    world
        .overrides()
        .set_override(
            program,
            owner,
            OverrideScope::Channel(channel),
            OverrideTarget::User(admin),
            SetOverrideRequest {
                allow: None,
                deny: names(&["VIEW_CHANNELS", "SEND_MESSAGES"]),
            },
        )
        .await
        .unwrap();

    let resolved = world
        .permissions()
        .resolve_channel_permissions(program, admin, channel)
        .await
        .unwrap();
    assert_eq!(resolved, Permissions::ALL);
    world
        .permissions()
        .require_permission(program, admin, Permissions::BAN_MEMBERS)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_channel_from_other_program_is_not_found() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let first = world.program(owner).await.id;
    let second = world.program(owner).await.id;
    let channel = world.channel(second, None).await;

    let err = world
        .permissions()
        .resolve_channel_permissions(first, owner, channel)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ChannelNotFound(_))));
}

// ============================================================================
// Override management
// ============================================================================

#[tokio::test]
async fn test_override_writes_are_validated() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let alice = world.member(program.id, "alice").await;
    let category = world.category(program.id).await;
    let channel = world.channel(program.id, Some(category)).await;
    let everyone = OverrideTarget::Role(program.everyone_role_id);
    let overrides = world.overrides();

    let err = overrides
        .set_override(
            program.id,
            alice,
            OverrideScope::Channel(channel),
            everyone,
            SetOverrideRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::MissingPermission(_))));

    let err = overrides
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            everyone,
            SetOverrideRequest {
                allow: names(&["SEND_MESSAGES"]),
                deny: names(&["SEND_MESSAGES"]),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ConflictingOverride(_))));

    let err = overrides
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            everyone,
            SetOverrideRequest {
                allow: names(&["ADMINISTRATOR"]),
                deny: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ConflictingOverride(_))));

    let err = overrides
        .set_override(
            program.id,
            owner,
            OverrideScope::Category(channel),
            everyone,
            SetOverrideRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ValidationError(_))));

    let err = overrides
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(category),
            everyone,
            SetOverrideRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::ValidationError(_))));

    let other = world.program(owner).await;
    let err = overrides
        .set_override(
            program.id,
            owner,
            OverrideScope::Channel(channel),
            OverrideTarget::Role(other.everyone_role_id),
            SetOverrideRequest::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::RoleNotFound(_))));
}

#[tokio::test]
async fn test_override_upsert_list_and_delete() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await;
    let channel = world.channel(program.id, None).await;
    let scope = OverrideScope::Channel(channel);
    let target = OverrideTarget::Role(program.everyone_role_id);
    let overrides = world.overrides();

    let first = overrides
        .set_override(
            program.id,
            owner,
            scope,
            target,
            SetOverrideRequest {
                allow: None,
                deny: names(&["SEND_MESSAGES"]),
            },
        )
        .await
        .unwrap();
    let second = overrides
        .set_override(
            program.id,
            owner,
            scope,
            target,
            SetOverrideRequest {
                allow: names(&["ATTACH_FILES"]),
                deny: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.allow, Permissions::ATTACH_FILES);
    assert!(second.deny.is_empty());

    let listed = overrides.list_overrides(program.id, owner, scope).await.unwrap();
    assert_eq!(listed.len(), 1);

    overrides.delete_override(program.id, owner, scope, target).await.unwrap();
    let err = overrides
        .delete_override(program.id, owner, scope, target)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::OverrideNotFound)));
}

#[tokio::test]
async fn test_deleting_role_drops_its_overrides() {
    let world = TestWorld::new();
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let channel = world.channel(program, None).await;
    let muted = world
        .grant(program, owner, alice, "Muted", Tier::Member, Permissions::empty())
        .await;
    let scope = OverrideScope::Channel(channel);

    world
        .overrides()
        .set_override(
            program,
            owner,
            scope,
            OverrideTarget::Role(muted),
            SetOverrideRequest {
                allow: None,
                deny: names(&["SEND_MESSAGES"]),
            },
        )
        .await
        .unwrap();
    assert!(!world
        .permissions()
        .check_channel_permission(program, alice, channel, Permissions::SEND_MESSAGES)
        .await
        .unwrap());

    world.roles().delete_role(program, muted, owner).await.unwrap();

    assert!(world
        .overrides()
        .list_overrides(program, owner, scope)
        .await
        .unwrap()
        .is_empty());
    assert!(world
        .permissions()
        .check_channel_permission(program, alice, channel, Permissions::SEND_MESSAGES)
        .await
        .unwrap());
}

// ============================================================================
// Authority cache
// ============================================================================

#[tokio::test]
async fn test_cache_is_invalidated_by_writes() {
    let world = TestWorld::with_cache(Duration::from_secs(60));
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let authority = AuthorityService::new(&world.ctx);

    assert_eq!(authority.resolve_authority(alice, program).await.unwrap().tier, Tier::Member);
    assert!(world.ctx.authority_cache().get(program, alice).is_some());

    // Assignment drops alice's entry
    let mods = world
        .grant(program, owner, alice, "Mods", Tier::Moderator, Permissions::KICK_MEMBERS)
        .await;
    assert_eq!(
        authority.resolve_authority(alice, program).await.unwrap().tier,
        Tier::Moderator
    );

    // Role edits drop every entry in the program
    world
        .roles()
        .update_role(
            program,
            mods,
            owner,
            UpdateRoleRequest {
                permissions: names(&["KICK_MEMBERS", "MUTE_MEMBERS"]),
                ..UpdateRoleRequest::default()
            },
        )
        .await
        .unwrap();
    assert!(world.ctx.authority_cache().get(program, alice).is_none());
    assert!(authority
        .resolve_authority(alice, program)
        .await
        .unwrap()
        .permissions
        .contains(Permissions::MUTE_MEMBERS));

    world.programs().leave_program(program, alice).await.unwrap();
    let err = authority.resolve_authority(alice, program).await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NotAMember)));
}
