//! PostgreSQL implementation of OverrideRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use authz_core::entities::{OverrideScope, OverrideTarget, PermissionOverride};
use authz_core::error::DomainError;
use authz_core::traits::{OverrideRepository, RepoResult};

use crate::mappers::overrides_from_models;
use crate::models::OverrideModel;

use super::error::map_db_error;

/// PostgreSQL implementation of OverrideRepository
#[derive(Clone)]
pub struct PgOverrideRepository {
    pool: PgPool,
}

impl PgOverrideRepository {
    /// Create a new PgOverrideRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OverrideRepository for PgOverrideRepository {
    #[instrument(skip(self))]
    async fn find_by_scope(&self, scope: OverrideScope) -> RepoResult<Vec<PermissionOverride>> {
        let results = sqlx::query_as::<_, OverrideModel>(
            r#"
            SELECT id, scope_type, scope_id, target_type, target_id, allow_bits, deny_bits,
                   created_at, updated_at
            FROM permission_overrides
            WHERE scope_type = $1 AND scope_id = $2
            ORDER BY id
            "#,
        )
        .bind(scope.type_name())
        .bind(scope.id().into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        overrides_from_models(results)
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        scope: OverrideScope,
        target: OverrideTarget,
    ) -> RepoResult<Option<PermissionOverride>> {
        let result = sqlx::query_as::<_, OverrideModel>(
            r#"
            SELECT id, scope_type, scope_id, target_type, target_id, allow_bits, deny_bits,
                   created_at, updated_at
            FROM permission_overrides
            WHERE scope_type = $1 AND scope_id = $2 AND target_type = $3 AND target_id = $4
            "#,
        )
        .bind(scope.type_name())
        .bind(scope.id().into_inner())
        .bind(target.type_name())
        .bind(target.id().into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(PermissionOverride::try_from).transpose()
    }

    #[instrument(skip(self, ovr), fields(scope = ?ovr.scope, target = ?ovr.target))]
    async fn upsert(&self, ovr: &PermissionOverride) -> RepoResult<PermissionOverride> {
        let stored = sqlx::query_as::<_, OverrideModel>(
            r#"
            INSERT INTO permission_overrides (id, scope_type, scope_id, target_type, target_id,
                                              allow_bits, deny_bits, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (scope_type, scope_id, target_type, target_id)
            DO UPDATE SET allow_bits = EXCLUDED.allow_bits,
                          deny_bits = EXCLUDED.deny_bits,
                          updated_at = NOW()
            RETURNING id, scope_type, scope_id, target_type, target_id, allow_bits, deny_bits,
                      created_at, updated_at
            "#,
        )
        .bind(ovr.id.into_inner())
        .bind(ovr.scope.type_name())
        .bind(ovr.scope.id().into_inner())
        .bind(ovr.target.type_name())
        .bind(ovr.target.id().into_inner())
        .bind(ovr.allow.to_i64())
        .bind(ovr.deny.to_i64())
        .bind(ovr.created_at)
        .bind(ovr.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        PermissionOverride::try_from(stored)
    }

    #[instrument(skip(self))]
    async fn delete(&self, scope: OverrideScope, target: OverrideTarget) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM permission_overrides
            WHERE scope_type = $1 AND scope_id = $2 AND target_type = $3 AND target_id = $4
            "#,
        )
        .bind(scope.type_name())
        .bind(scope.id().into_inner())
        .bind(target.type_name())
        .bind(target.id().into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::OverrideNotFound);
        }

        Ok(())
    }
}
