//! PostgreSQL implementation of ProgramRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use authz_core::entities::{Membership, Program, Role};
use authz_core::traits::{ProgramRepository, RepoResult};
use authz_core::value_objects::Snowflake;

use crate::models::ProgramModel;

use super::error::{map_db_error, program_not_found};
use super::membership::insert_membership;
use super::role::insert_role;

/// PostgreSQL implementation of ProgramRepository
#[derive(Clone)]
pub struct PgProgramRepository {
    pool: PgPool,
}

impl PgProgramRepository {
    /// Create a new PgProgramRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgramRepository for PgProgramRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Program>> {
        let result = sqlx::query_as::<_, ProgramModel>(
            r#"
            SELECT id, name, owner_id, created_at, updated_at
            FROM programs
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Program::from))
    }

    #[instrument(skip_all, fields(program_id = %program.id, owner_id = %program.owner_id))]
    async fn create_with_owner(
        &self,
        program: &Program,
        everyone: &Role,
        owner_membership: &Membership,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO programs (id, name, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(program.id.into_inner())
        .bind(&program.name)
        .bind(program.owner_id.into_inner())
        .bind(program.created_at)
        .bind(program.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        insert_role(&mut *tx, everyone).await?;
        insert_membership(&mut *tx, owner_membership, everyone.id).await?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Roles, memberships, channels and their overrides cascade
        let result = sqlx::query(
            r#"
            DELETE FROM programs WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(program_not_found(id));
        }

        Ok(())
    }
}
