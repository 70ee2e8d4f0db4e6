//! PostgreSQL implementation of MembershipRepository

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use authz_core::entities::{MemberRoles, Membership};
use authz_core::error::DomainError;
use authz_core::traits::{MembershipRepository, RepoResult};
use authz_core::value_objects::Snowflake;

use crate::mappers::{member_with_roles, roles_from_models};
use crate::models::{MembershipModel, RoleModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of MembershipRepository
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_model(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MembershipModel>> {
        sqlx::query_as::<_, MembershipModel>(
            r#"
            SELECT id, program_id, user_id, nickname, joined_at
            FROM memberships
            WHERE program_id = $1 AND user_id = $2
            "#,
        )
        .bind(program_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

/// Insert a membership and its `@everyone` grant on an open transaction
pub(super) async fn insert_membership(
    conn: &mut PgConnection,
    membership: &Membership,
    everyone_role_id: Snowflake,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO memberships (id, program_id, user_id, nickname, joined_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(membership.id.into_inner())
    .bind(membership.program_id.into_inner())
    .bind(membership.user_id.into_inner())
    .bind(&membership.nickname)
    .bind(membership.joined_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::AlreadyMember))?;

    sqlx::query(
        r#"
        INSERT INTO member_roles (membership_id, role_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(membership.id.into_inner())
    .bind(everyone_role_id.into_inner())
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    #[instrument(skip(self))]
    async fn find(&self, program_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Membership>> {
        Ok(self.find_model(program_id, user_id).await?.map(Membership::from))
    }

    #[instrument(skip(self))]
    async fn find_with_roles(
        &self,
        program_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberRoles>> {
        let Some(model) = self.find_model(program_id, user_id).await? else {
            return Ok(None);
        };

        let roles = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT r.id, r.program_id, r.name, r.color, r.tier, r.permissions, r.is_everyone,
                   r.is_hoisted, r.is_mentionable, r.created_at, r.updated_at
            FROM member_roles mr
            JOIN roles r ON r.id = mr.role_id
            WHERE mr.membership_id = $1
            ORDER BY r.tier, r.id
            "#,
        )
        .bind(model.id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Some(member_with_roles(model, roles_from_models(roles)?)))
    }

    #[instrument(skip(self, membership), fields(program_id = %membership.program_id, user_id = %membership.user_id))]
    async fn create(&self, membership: &Membership, everyone_role_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        insert_membership(&mut *tx, membership, everyone_role_id).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, program_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // member_roles rows cascade
        let result = sqlx::query(
            r#"
            DELETE FROM memberships WHERE program_id = $1 AND user_id = $2
            "#,
        )
        .bind(program_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotAMember);
        }

        // User-keyed overrides have no foreign key to memberships; a later
        // rejoin starts clean
        sqlx::query(
            r#"
            DELETE FROM permission_overrides o
            USING channels c
            WHERE o.scope_id = c.id
              AND c.program_id = $1
              AND o.target_type = 'user'
              AND o.target_id = $2
            "#,
        )
        .bind(program_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn add_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member_roles (membership_id, role_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(membership_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyAssigned))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_role(&self, membership_id: Snowflake, role_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM member_roles mr
            USING roles r
            WHERE mr.membership_id = $1
              AND mr.role_id = $2
              AND r.id = mr.role_id
              AND r.is_everyone = FALSE
            "#,
        )
        .bind(membership_id.into_inner())
        .bind(role_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotAssigned);
        }

        Ok(())
    }
}
