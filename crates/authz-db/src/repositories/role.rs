//! PostgreSQL implementation of RoleRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tracing::instrument;

use authz_core::entities::Role;
use authz_core::error::DomainError;
use authz_core::traits::{RepoResult, RoleRepository};
use authz_core::value_objects::Snowflake;

use crate::mappers::roles_from_models;
use crate::models::RoleModel;

use super::error::{map_db_error, map_unique_violation, role_not_found};

/// PostgreSQL implementation of RoleRepository
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new PgRoleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert a role row through any executor (pool or open transaction)
pub(super) async fn insert_role<'e, E>(executor: E, role: &Role) -> RepoResult<()>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    sqlx::query(
        r#"
        INSERT INTO roles (id, program_id, name, color, tier, permissions, is_everyone,
                           is_hoisted, is_mentionable, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(role.id.into_inner())
    .bind(role.program_id.into_inner())
    .bind(&role.name)
    .bind(role.color)
    .bind(role.tier.as_i16())
    .bind(role.permissions.to_i64())
    .bind(role.is_everyone)
    .bind(role.is_hoisted)
    .bind(role.is_mentionable)
    .bind(role.created_at)
    .bind(role.updated_at)
    .execute(executor)
    .await
    .map_err(|e| map_unique_violation(e, || DomainError::DuplicateRoleName(role.name.clone())))?;

    Ok(())
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, program_id, name, color, tier, permissions, is_everyone,
                   is_hoisted, is_mentionable, created_at, updated_at
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Role::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_program(&self, program_id: Snowflake) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, program_id, name, color, tier, permissions, is_everyone,
                   is_hoisted, is_mentionable, created_at, updated_at
            FROM roles
            WHERE program_id = $1
            ORDER BY tier, id
            "#,
        )
        .bind(program_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        roles_from_models(results)
    }

    #[instrument(skip(self))]
    async fn find_everyone(&self, program_id: Snowflake) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r#"
            SELECT id, program_id, name, color, tier, permissions, is_everyone,
                   is_hoisted, is_mentionable, created_at, updated_at
            FROM roles
            WHERE program_id = $1 AND is_everyone = TRUE
            "#,
        )
        .bind(program_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Role::try_from).transpose()
    }

    #[instrument(skip(self, role), fields(role_id = %role.id, program_id = %role.program_id))]
    async fn create(&self, role: &Role) -> RepoResult<()> {
        insert_role(&self.pool, role).await
    }

    #[instrument(skip(self, role), fields(role_id = %role.id))]
    async fn update(&self, role: &Role) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE roles
            SET name = $2, color = $3, tier = $4, permissions = $5,
                is_hoisted = $6, is_mentionable = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(role.color)
        .bind(role.tier.as_i16())
        .bind(role.permissions.to_i64())
        .bind(role.is_hoisted)
        .bind(role.is_mentionable)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::DuplicateRoleName(role.name.clone())))?;

        if result.rows_affected() == 0 {
            return Err(role_not_found(role.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Check if it's the @everyone role
        let is_everyone = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_everyone FROM roles WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        match is_everyone {
            None => return Err(role_not_found(id)),
            Some(true) => return Err(DomainError::CannotDeleteEveryone),
            Some(false) => {}
        }

        // Role-keyed overrides have no foreign key to roles
        sqlx::query(
            r#"
            DELETE FROM permission_overrides WHERE target_type = 'role' AND target_id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // member_roles rows cascade
        sqlx::query(
            r#"
            DELETE FROM roles WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
