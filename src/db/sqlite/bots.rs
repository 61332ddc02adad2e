use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, scope_predicate};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{BotRepo, ListParams},
    },
    models::{Bot, CreateBot, UpdateBot},
    tenancy::TenantScope,
};

pub struct SqliteBotRepo {
    pool: SqlitePool,
}

impl SqliteBotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const BOT_COLUMNS: &str =
    "id, tenant_id, name, phone_number, ai_config, is_active, deleted_at, created_at, updated_at";

fn bot_from_row(row: &SqliteRow) -> DbResult<Bot> {
    let ai_config_raw: String = row.get("ai_config");
    Ok(Bot {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        tenant_id: parse_uuid(&row.get::<String, _>("tenant_id"))?,
        name: row.get("name"),
        phone_number: row.get("phone_number"),
        ai_config: serde_json::from_str(&ai_config_raw)?,
        is_active: row.get("is_active"),
        deleted_at: row.get("deleted_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl BotRepo for SqliteBotRepo {
    async fn create(&self, tenant_id: Uuid, input: CreateBot) -> DbResult<Bot> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        let ai_config = serde_json::to_string(&input.ai_config)?;

        sqlx::query(
            r#"
            INSERT INTO bots (id, tenant_id, name, phone_number, ai_config, is_active,
                              created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(tenant_id.to_string())
        .bind(&input.name)
        .bind(&input.phone_number)
        .bind(&ai_config)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Bot {
            id,
            tenant_id,
            name: input.name,
            phone_number: input.phone_number,
            ai_config: input.ai_config,
            is_active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<Bot>> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");

        let query = format!(
            "SELECT {} FROM bots WHERE id = ? AND deleted_at IS NULL {}",
            BOT_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let result = query_builder.fetch_optional(&self.pool).await?;

        result.as_ref().map(bot_from_row).transpose()
    }

    async fn list(&self, scope: &TenantScope, params: ListParams) -> DbResult<Vec<Bot>> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let deleted_filter = if params.include_deleted {
            ""
        } else {
            "AND deleted_at IS NULL"
        };
        let (limit, offset) = params.limit_offset();

        let query = format!(
            "SELECT {} FROM bots WHERE 1 = 1 {} {} ORDER BY created_at, id LIMIT ? OFFSET ?",
            BOT_COLUMNS, predicate, deleted_filter
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

        rows.iter().map(bot_from_row).collect()
    }

    async fn count(&self, scope: &TenantScope) -> DbResult<i64> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");

        let query = format!(
            "SELECT COUNT(*) as count FROM bots WHERE deleted_at IS NULL {}",
            predicate
        );

        let mut query_builder = sqlx::query(&query);
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let row = query_builder.fetch_one(&self.pool).await?;
        Ok(row.get("count"))
    }

    async fn update(&self, scope: &TenantScope, id: Uuid, input: UpdateBot) -> DbResult<Bot> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let now = chrono::Utc::now();
        let ai_config = input
            .ai_config
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let query = format!(
            r#"
            UPDATE bots
            SET name = COALESCE(?, name),
                phone_number = COALESCE(?, phone_number),
                ai_config = COALESCE(?, ai_config),
                is_active = COALESCE(?, is_active),
                updated_at = ?
            WHERE id = ? AND deleted_at IS NULL {}
            "#,
            predicate
        );

        let mut query_builder = sqlx::query(&query)
            .bind(input.name)
            .bind(input.phone_number)
            .bind(ai_config)
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

        self.get_by_id(scope, id).await?.ok_or(DbError::NotFound)
    }

    async fn delete(&self, scope: &TenantScope, id: Uuid) -> DbResult<()> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let now = chrono::Utc::now();

        let query = format!(
            "UPDATE bots SET deleted_at = ?, updated_at = ? \
             WHERE id = ? AND deleted_at IS NULL {}",
            predicate
        );

        let mut query_builder = sqlx::query(&query)
            .bind(now)
            .bind(now)
            .bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }

        let result = query_builder.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    async fn restore(&self, scope: &TenantScope, id: Uuid) -> DbResult<Bot> {
        scope.log_applied("bots");
        let (predicate, scope_bind) = scope_predicate(scope, "tenant_id");
        let now = chrono::Utc::now();

        let query = format!(
            "UPDATE bots SET deleted_at = NULL, updated_at = ? \
             WHERE id = ? AND deleted_at IS NOT NULL {}",
            predicate
        );

        let mut query_builder = sqlx::query(&query).bind(now).bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }

        let result = query_builder.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }

        self.get_by_id(scope, id).await?.ok_or(DbError::NotFound)
    }
}
