//! Authority cache against writes that race a resolution

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authz_core::{
    MemberRoles, Membership, MembershipRepository, Permissions, RepoResult, Snowflake,
    SnowflakeGenerator, Tier,
};
use authz_service::{AuthorityCache, AuthorityService, ServiceContextBuilder};
use integration_tests::{MemoryStore, TestWorld};
use parking_lot::Mutex;

/// Membership reads that let a revocation commit right after the read
///
/// The revocation runs the way a role service write does: storage first,
/// then the cache invalidation.
struct RevokeAfterRead {
    store: Arc<MemoryStore>,
    cache: Arc<AuthorityCache>,
    /// `(program, user, membership, role)` to revoke on the next read
    pending: Mutex<Option<(Snowflake, Snowflake, Snowflake, Snowflake)>>,
}

#[async_trait]
impl MembershipRepository for RevokeAfterRead {
    async fn find(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Membership>> {
        MembershipRepository::find(self.store.as_ref(), program_id, user_id).await
    }

    async fn find_with_roles(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRoles>> {
        let read =
            MembershipRepository::find_with_roles(self.store.as_ref(), program_id, user_id).await?;
        let pending = self.pending.lock().take();
        if let Some((program, user, membership, role)) = pending {
            MembershipRepository::remove_role(self.store.as_ref(), membership, role).await?;
            self.cache.invalidate_member(program, user);
        }
        Ok(read)
    }

    async fn create(&self, membership: &Membership, everyone_role_id: Snowflake) -> RepoResult<()> {
        MembershipRepository::create(self.store.as_ref(), membership, everyone_role_id).await
    }

    async fn delete(&self, program_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        MembershipRepository::delete(self.store.as_ref(), program_id, user_id).await
    }

    async fn add_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        MembershipRepository::add_role(self.store.as_ref(), membership_id, role_id).await
    }

    async fn remove_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        MembershipRepository::remove_role(self.store.as_ref(), membership_id, role_id).await
    }
}

#[tokio::test]
async fn test_revocation_during_resolution_is_not_cached() {
    let store = MemoryStore::new();
    let cache = Arc::new(AuthorityCache::new(Duration::from_secs(60)));
    let memberships = Arc::new(RevokeAfterRead {
        store: store.clone(),
        cache: cache.clone(),
        pending: Mutex::new(None),
    });
    let ctx = ServiceContextBuilder::new()
        .user_repo(store.clone())
        .program_repo(store.clone())
        .membership_repo(memberships.clone())
        .role_repo(store.clone())
        .channel_repo(store.clone())
        .override_repo(store.clone())
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .authority_cache(cache.clone())
        .build()
        .expect("all repositories provided");

    let world = TestWorld::over(Arc::clone(&store), ctx);
    let owner = world.user("owner").await;
    let program = world.program(owner).await.id;
    let alice = world.member(program, "alice").await;
    let admins = world
        .grant(program, owner, alice, "Admins", Tier::Admin, Permissions::BAN_MEMBERS)
        .await;
    let membership = MembershipRepository::find(store.as_ref(), program, alice)
        .await
        .unwrap()
        .expect("alice is a member");

    let authority = AuthorityService::new(&world.ctx);
    *memberships.pending.lock() = Some((program, alice, membership.id, admins));

    // The in-flight resolution saw the role before it was revoked
    let stale = authority.resolve_authority(alice, program).await.unwrap();
    assert_eq!(stale.tier, Tier::Admin);
    assert!(cache.get(program, alice).is_none());

    let current = authority.resolve_authority(alice, program).await.unwrap();
    assert_eq!(current.tier, Tier::Member);
    assert!(!current.permissions.contains(Permissions::BAN_MEMBERS));
    assert_eq!(cache.get(program, alice).map(|a| a.tier), Some(Tier::Member));
}
