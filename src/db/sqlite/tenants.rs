use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ListParams, TenantRepo},
    },
    models::{
        CreateTenant, SubscriptionPlan, SubscriptionStatus, Tenant, TenantLimits, UpdateTenant,
    },
};

pub struct SqliteTenantRepo {
    pool: SqlitePool,
}

impl SqliteTenantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const TENANT_COLUMNS: &str = "id, slug, name, plan, status, subscription_ends_at, \
     max_bots, max_conversations_per_month, max_users, created_at, updated_at";

fn tenant_from_row(row: &SqliteRow) -> DbResult<Tenant> {
    let plan_raw: String = row.get("plan");
    let status_raw: String = row.get("status");
    Ok(Tenant {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        slug: row.get("slug"),
        name: row.get("name"),
        plan: SubscriptionPlan::parse(&plan_raw)
            .ok_or_else(|| DbError::Internal(format!("Invalid plan in database: {}", plan_raw)))?,
        status: SubscriptionStatus::parse(&status_raw).ok_or_else(|| {
            DbError::Internal(format!("Invalid status in database: {}", status_raw))
        })?,
        subscription_ends_at: row.get("subscription_ends_at"),
        limits: TenantLimits {
            max_bots: row.get("max_bots"),
            max_conversations_per_month: row.get("max_conversations_per_month"),
            max_users: row.get("max_users"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl TenantRepo for SqliteTenantRepo {
    async fn create(&self, input: CreateTenant) -> DbResult<Tenant> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let limits = TenantLimits::default();

        sqlx::query(
            r#"
            INSERT INTO tenants (id, slug, name, plan, status, subscription_ends_at,
                                 max_bots, max_conversations_per_month, max_users,
                                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.slug)
        .bind(&input.name)
        .bind(input.plan.as_str())
        .bind(SubscriptionStatus::Trial.as_str())
        .bind(input.subscription_ends_at)
        .bind(limits.max_bots)
        .bind(limits.max_conversations_per_month)
        .bind(limits.max_users)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(format!("Tenant with slug '{}' already exists", input.slug))
            }
            _ => DbError::from(e),
        })?;

        Ok(Tenant {
            id,
            slug: input.slug,
            name: input.name,
            plan: input.plan,
            status: SubscriptionStatus::Trial,
            subscription_ends_at: input.subscription_ends_at,
            limits,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Tenant>> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM tenants WHERE id = ?",
            TENANT_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        result.as_ref().map(tenant_from_row).transpose()
    }

    async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Tenant>> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM tenants WHERE slug = ?",
            TENANT_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        result.as_ref().map(tenant_from_row).transpose()
    }

    async fn list(&self, params: ListParams) -> DbResult<Vec<Tenant>> {
        let (limit, offset) = params.limit_offset();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tenants ORDER BY created_at, id LIMIT ? OFFSET ?",
            TENANT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(tenant_from_row).collect()
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> DbResult<Tenant> {
        let current = self.get_by_id(id).await?.ok_or(DbError::NotFound)?;
        let now = chrono::Utc::now();

        let name = input.name.unwrap_or(current.name);
        let plan = input.plan.unwrap_or(current.plan);
        let status = input.status.unwrap_or(current.status);
        let subscription_ends_at = input
            .subscription_ends_at
            .or(current.subscription_ends_at);
        let limits = input.limits.unwrap_or(current.limits);

        sqlx::query(
            r#"
            UPDATE tenants
            SET name = ?, plan = ?, status = ?, subscription_ends_at = ?,
                max_bots = ?, max_conversations_per_month = ?, max_users = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&name)
        .bind(plan.as_str())
        .bind(status.as_str())
        .bind(subscription_ends_at)
        .bind(limits.max_bots)
        .bind(limits.max_conversations_per_month)
        .bind(limits.max_users)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(Tenant {
            id,
            slug: current.slug,
            name,
            plan,
            status,
            subscription_ends_at,
            limits,
            created_at: current.created_at,
            updated_at: now,
        })
    }
}
