use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::{parse_uuid, scope_predicate};
use crate::{
    db::{
        error::{DbError, DbResult},
        repos::KnowledgeBaseRepo,
    },
    models::{CreateKnowledgeBase, KnowledgeBase, UpdateKnowledgeBase},
    tenancy::TenantScope,
};

pub struct SqliteKnowledgeBaseRepo {
    pool: SqlitePool,
}

impl SqliteKnowledgeBaseRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const KB_COLUMNS: &str = "k.id, k.bot_id, k.name, k.created_at, k.updated_at";

fn kb_from_row(row: &SqliteRow) -> DbResult<KnowledgeBase> {
    Ok(KnowledgeBase {
        id: parse_uuid(&row.get::<String, _>("id"))?,
        bot_id: parse_uuid(&row.get::<String, _>("bot_id"))?,
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl KnowledgeBaseRepo for SqliteKnowledgeBaseRepo {
    async fn create(&self, bot_id: Uuid, input: CreateKnowledgeBase) -> DbResult<KnowledgeBase> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO knowledge_bases (id, bot_id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(bot_id.to_string())
        .bind(&input.name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict("Bot already has a knowledge base".to_string())
            }
            _ => DbError::from(e),
        })?;

        Ok(KnowledgeBase {
            id,
            bot_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<KnowledgeBase>> {
        scope.log_applied("knowledge_bases");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");

        let query = format!(
            "SELECT {} FROM knowledge_bases k \
             INNER JOIN bots b ON k.bot_id = b.id \
             WHERE k.id = ? {}",
            KB_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let result = query_builder.fetch_optional(&self.pool).await?;

        result.as_ref().map(kb_from_row).transpose()
    }

    async fn get_by_bot(
        &self,
        scope: &TenantScope,
        bot_id: Uuid,
    ) -> DbResult<Option<KnowledgeBase>> {
        scope.log_applied("knowledge_bases");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");

        let query = format!(
            "SELECT {} FROM knowledge_bases k \
             INNER JOIN bots b ON k.bot_id = b.id \
             WHERE k.bot_id = ? {}",
            KB_COLUMNS, predicate
        );

        let mut query_builder = sqlx::query(&query).bind(bot_id.to_string());
        if let Some(bind) = scope_bind {
            query_builder = query_builder.bind(bind);
        }
        let result = query_builder.fetch_optional(&self.pool).await?;

        result.as_ref().map(kb_from_row).transpose()
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateKnowledgeBase,
    ) -> DbResult<KnowledgeBase> {
        scope.log_applied("knowledge_bases");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");
        let now = chrono::Utc::now();

        let query = format!(
            r#"
            UPDATE knowledge_bases
            SET name = COALESCE(?, name),
                updated_at = ?
            WHERE id = ? AND bot_id IN (SELECT b.id FROM bots b WHERE 1 = 1 {})
            "#,
            predicate
        );

        let mut query_builder = sqlx::query(&query)
            .bind(input.name)
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
        scope.log_applied("knowledge_bases");
        let (predicate, scope_bind) = scope_predicate(scope, "b.tenant_id");

        let query = format!(
            "DELETE FROM knowledge_bases \
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
