use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, scope_predicate};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::{ConversationRepo, ListParams},
    },
    models::{Conversation, ConversationStatus, CreateConversation, UpdateConversation},
    tenancy::TenantScope,
};

pub struct SqliteConversationRepo {
    pool: SqlitePool,
}

impl SqliteConversationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const CONVERSATION_COLUMNS: &str = "c.id, c.bot_id, c.assigned_user_id, c.contact_phone, \
     c.status, c.created_at, c.updated_at";

fn conversation_from_row(row: &SqliteRow) -> DbResult<Conversation> {
    let status_raw: String = row.get("status");
    let assigned_user_id = row
        .get::<Option<String>, _>("assigned_user_id")
        .as_deref()
        .map(parse_uuid)
        .transpose()?;
    Ok(Conversation {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        bot_id: parse_uuid(&row.get::<String, _>("bot_id"))?,
        assigned_user_id,
        contact_phone: row.get("contact_phone"),
        status: ConversationStatus::parse(&status_raw).ok_or_else(|| {
            DbError::Internal(format!("Invalid status in database: {}", status_raw))
        })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl ConversationRepo for SqliteConversationRepo {
    async fn create(&self, bot_id: Uuid, input: CreateConversation) -> DbResult<Conversation> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO conversations (id, bot_id, contact_phone, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(bot_id.to_string())
        .bind(&input.contact_phone)
        .bind(input.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Conversation {
            id,
            bot_id,
            assigned_user_id: None,
            contact_phone: input.contact_phone,
            status: input.status,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<Conversation>> {
        scope.log_applied("conversations");
        // Tenant is inherited through the owning bot.
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");

        let query = format!(
            "SELECT {} FROM conversations c \
             INNER JOIN bots b ON c.bot_id = b.id \
             WHERE c.id = ? {}",
            CONVERSATION_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let result = query_builder.fetch_optional(&self.pool).await?;

        result.as_ref().map(conversation_from_row).transpose()
    }

    async fn list_by_bot(
        &self,
        scope: &TenantScope,
        bot_id: Uuid,
        params: ListParams,
    ) -> DbResult<Vec<Conversation>> {
        scope.log_applied("conversations");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");
        let (limit, offset) = params.limit_offset();

        let query = format!(
            "SELECT {} FROM conversations c \
             INNER JOIN bots b ON c.bot_id = b.id \
             WHERE c.bot_id = ? {} \
             ORDER BY c.created_at, c.id LIMIT ? OFFSET ?",
            CONVERSATION_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(bot_id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let rows = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(conversation_from_row).collect()
    }

    async fn list_assigned_to(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        params: ListParams,
    ) -> DbResult<Vec<Conversation>> {
        scope.log_applied("conversations");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");
        let (limit, offset) = params.limit_offset();

        let query = format!(
            "SELECT {} FROM conversations c \
             INNER JOIN bots b ON c.bot_id = b.id \
             WHERE c.assigned_user_id = ? {} \
             ORDER BY c.created_at, c.id LIMIT ? OFFSET ?",
            CONVERSATION_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(user_id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let rows = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(conversation_from_row).collect()
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateConversation,
    ) -> DbResult<Conversation> {
        scope.log_applied("conversations");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");
        let now = chrono::Utc::now();

        // SQLite UPDATE cannot join, so the scope runs in a subquery on the
        // owning bot.
        let query = format!(
            r#"
            UPDATE conversations
            SET status = COALESCE(?, status),
                assigned_user_id = COALESCE(?, assigned_user_id),
                updated_at = ?
            WHERE id = ? AND bot_id IN (SELECT b.id FROM bots b WHERE 1 = 1 {})
            "#,
            predicate
        );

        let mut query_builder = sqlx::query(&query)
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.assigned_user_id.map(|u| u.to_string()))
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
        scope.log_applied("conversations");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");

        let query = format!(
            "DELETE FROM conversations \
             WHERE id = ? AND bot_id IN (SELECT b.id FROM bots b WHERE 1 = 1 {})",
            predicate
        );

        let mut query_builder = sqlx::query(&query).bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }

        let result = query_builder.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }
}
