use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use sweldo_application::AccessGrantRepository;
use sweldo_core::{AppError, AppResult, CompanyId, CompanyRole, UserId};
use sweldo_domain::AccessGrant;

/// PostgreSQL-backed repository for company access grants.
#[derive(Clone)]
pub struct PostgresAccessGrantRepository {
    pool: PgPool,
}

impl PostgresAccessGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct GrantRow {
    user_id: Uuid,
    company_id: Uuid,
    role: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    company_code: String,
    company_name: String,
    company_active: bool,
}

impl GrantRow {
    /// Converts a stored row into a domain grant.
    ///
    /// Rows with an unrecognized role value are dropped rather than
    /// surfaced: an unknown role must resolve to the most restrictive
    /// outcome, never to a crashed request.
    fn into_grant(self) -> Option<AccessGrant> {
        let role = match CompanyRole::from_str(self.role.as_str()) {
            Ok(role) => role,
            Err(_) => {
                tracing::warn!(
                    user_id = %self.user_id,
                    company_id = %self.company_id,
                    role = %self.role,
                    "dropping access grant with unrecognized role"
                );
                return None;
            }
        };

        Some(AccessGrant {
            user_id: UserId::from_uuid(self.user_id),
            company_id: CompanyId::from_uuid(self.company_id),
            company_code: self.company_code,
            company_name: self.company_name,
            company_active: self.company_active,
            role,
            is_default: self.is_default,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl AccessGrantRepository for PostgresAccessGrantRepository {
    async fn list_active_grants(&self, user_id: UserId) -> AppResult<Vec<AccessGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT
                g.user_id,
                g.company_id,
                g.role,
                g.is_default,
                g.created_at,
                c.code AS company_code,
                c.name AS company_name,
                c.is_active AS company_active
            FROM company_access_grants g
            JOIN companies c ON c.id = g.company_id
            WHERE g.user_id = $1 AND g.is_active
            ORDER BY g.is_default DESC, g.created_at ASC, g.company_id ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list access grants: {error}")))?;

        Ok(rows.into_iter().filter_map(GrantRow::into_grant).collect())
    }

    async fn selected_company(&self, user_id: UserId) -> AppResult<Option<CompanyId>> {
        let selected = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            SELECT selected_company_id
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read selected company: {error}"))
        })?;

        Ok(selected.flatten().map(CompanyId::from_uuid))
    }

    async fn save_selected_company(&self, user_id: UserId, company_id: CompanyId) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET selected_company_id = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(company_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist selected company: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user '{user_id}' not found")));
        }

        Ok(())
    }
}
