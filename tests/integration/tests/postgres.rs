//! Service flows against PostgreSQL
//!
//! Requires `DATABASE_URL`; each test returns early when it is unset.
//!
//! Run with: cargo test -p integration-tests --test postgres

use authz_core::entities::{OverrideScope, OverrideTarget, User};
use authz_core::{Channel, ChannelRepository, DomainError, Permissions, Tier, UserRepository};
use authz_service::dto::{CreateProgramRequest, PermissionsInput, SetOverrideRequest};
use authz_service::{AuthorityService, OverrideService, PermissionService, ProgramService, RoleService};
use integration_tests::{check_test_env, pg_context, role_request, test_pool};

#[tokio::test]
async fn test_role_and_override_flow() {
    if !check_test_env() {
        return;
    }
    let (config, pool) = test_pool().await.expect("database");
    let ctx = pg_context(&config, &pool).expect("context");

    let owner = User::new(ctx.generate_id(), "pg-owner".to_string());
    let alice = User::new(ctx.generate_id(), "pg-alice".to_string());
    ctx.user_repo().create(&owner).await.unwrap();
    ctx.user_repo().create(&alice).await.unwrap();

    let program = ProgramService::new(&ctx)
        .create_program(
            owner.id,
            CreateProgramRequest {
                name: "Postgres Program".to_string(),
            },
        )
        .await
        .unwrap();
    ProgramService::new(&ctx)
        .join_program(program.id, alice.id)
        .await
        .unwrap();

    let roles = RoleService::new(&ctx);
    let err = roles
        .create_role(
            program.id,
            owner.id,
            role_request("Helpers", Tier::Member, Permissions::MANAGE_ROLES),
        )
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::PermissionExceedsTier { .. })));

    let mods = roles
        .create_role(
            program.id,
            owner.id,
            role_request("Mods", Tier::Moderator, Permissions::KICK_MEMBERS),
        )
        .await
        .unwrap();
    roles
        .assign_role(program.id, mods.id, alice.id, owner.id)
        .await
        .unwrap();

    let authority = AuthorityService::new(&ctx)
        .resolve_authority(alice.id, program.id)
        .await
        .unwrap();
    assert_eq!(authority.tier, Tier::Moderator);
    assert_eq!(authority.role_ids.len(), 2);

    let channel = Channel::new_text(ctx.generate_id(), program.id, "general".to_string());
    ctx.channel_repo().create(&channel).await.unwrap();
    OverrideService::new(&ctx)
        .set_override(
            program.id,
            owner.id,
            OverrideScope::Channel(channel.id),
            OverrideTarget::Role(program.everyone_role_id),
            SetOverrideRequest {
                allow: None,
                deny: Some(PermissionsInput::Names(vec!["SEND_MESSAGES".to_string()])),
            },
        )
        .await
        .unwrap();

    assert!(!PermissionService::new(&ctx)
        .check_channel_permission(program.id, alice.id, channel.id, Permissions::SEND_MESSAGES)
        .await
        .unwrap());

    roles.delete_role(program.id, mods.id, owner.id).await.unwrap();
    let authority = AuthorityService::new(&ctx)
        .resolve_authority(alice.id, program.id)
        .await
        .unwrap();
    assert_eq!(authority.tier, Tier::Member);

    ProgramService::new(&ctx)
        .delete_program(program.id, owner.id)
        .await
        .unwrap();
}
