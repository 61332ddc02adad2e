use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, scope_predicate};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ListParams, UserRepo},
    },
    models::{CreateUser, UpdateUser, User, UserRole},
    tenancy::TenantScope,
};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id, tenant_id, email, name, role, is_active, created_at, updated_at";

fn user_from_row(row: &SqliteRow) -> DbResult<User> {
    let role_raw: String = row.get("role");
    let tenant_id = row
        .get::<Option<String>, _>("tenant_id")
        .as_deref()
        .map(parse_uuid)
        .transpose()?;
    Ok(User {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        tenant_id,
        email: row.get("email"),
        name: row.get("name"),
        role: UserRole::parse(&role_raw)
            .ok_or_else(|| DbError::Internal(format!("Invalid role in database: {}", role_raw)))?,
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn create(&self, input: CreateUser) -> DbResult<User> {
        if !input.role_tenant_consistent() {
            return Err(DbError::Validation(format!(
                "Role '{}' is inconsistent with the tenant reference",
                input.role
            )));
        }

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, tenant_id, email, name, role, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(input.tenant_id.map(|t| t.to_string()))
        .bind(&input.email)
        .bind(&input.name)
        .bind(input.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(format!("User with email '{}' already exists", input.email))
            }
            _ => DbError::from(e),
        })?;

        Ok(User {
            id,
            tenant_id: input.tenant_id,
            email: input.email,
            name: input.name,
            role: input.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>> {
        let result = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        result.as_ref().map(user_from_row).transpose()
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.as_ref().map(user_from_row).transpose()
    }

    async fn list(&self, scope: &TenantScope, params: ListParams) -> DbResult<Vec<User>> {
        scope.log_applied("users");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let (limit, offset) = params.limit_offset();

        let query = format!(
            "SELECT {} FROM users WHERE 1 = 1 {} ORDER BY created_at, id LIMIT ? OFFSET ?",
            USER_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query);
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let rows = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn update(&self, scope: &TenantScope, id: Uuid, input: UpdateUser) -> DbResult<User> {
        scope.log_applied("users");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let now = chrono::Utc::now();

        let query = format!(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                role = COALESCE(?, role),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ? {}
            "#,
            predicate
        );

        let mut query_builder = sqlx::query(&query)
            .bind(input.name)
            .bind(input.role.map(|r| r.as_str()))
            .bind(input.is_active)
            .bind(now)
            .bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }

        let result = query_builder.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        self.get_by_id(id).await?.ok_or(DbError::NotFound)
    }
}
