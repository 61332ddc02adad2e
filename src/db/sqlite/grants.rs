use async_trait::async_trait;
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use uuid::Uuid;

use super::common::parse_uuid;
use crate::{
    db::{
        error::DbResult,
        repos::BotGrantRepo,
    },
    models::{BotUserGrant, GrantFlags},
};

pub struct SqliteBotGrantRepo {
    pool: SqlitePool,
}

impl SqliteBotGrantRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const GRANT_COLUMNS: &str = "user_id, bot_id, can_manage, can_view_analytics, can_chat, \
     can_train_kb, can_delete_data, granted_at";

fn grant_from_row(row: &SqliteRow) -> DbResult<BotUserGrant> {
    Ok(BotUserGrant {
        user_id: parse_uuid(&row.get::<String, _>("user_id"))?,
        bot_id: parse_uuid(&row.get::<String, _>("bot_id"))?,
        can_manage: row.get("can_manage"),
        can_view_analytics: row.get("can_view_analytics"),
        can_chat: row.get("can_chat"),
        can_train_kb: row.get("can_train_kb"),
        can_delete_data: row.get("can_delete_data"),
        granted_at: row.get("granted_at"),
    })
}

#[async_trait]
impl BotGrantRepo for SqliteBotGrantRepo {
    async fn upsert(
        &self,
        user_id: Uuid,
        bot_id: Uuid,
        flags: GrantFlags,
    ) -> DbResult<BotUserGrant> {
        let now = chrono::Utc::now();

        // One atomic statement; granted_at is preserved on update so the
        // row still records when access was first given.
        sqlx::query(
            r#"
            INSERT INTO bot_user_grants (user_id, bot_id, can_manage, can_view_analytics,
                                         can_chat, can_train_kb, can_delete_data, granted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id, bot_id) DO UPDATE SET
                can_manage = excluded.can_manage,
                can_view_analytics = excluded.can_view_analytics,
                can_chat = excluded.can_chat,
                can_train_kb = excluded.can_train_kb,
                can_delete_data = excluded.can_delete_data
            "#,
        )
        .bind(user_id.to_string())
        .bind(bot_id.to_string())
        .bind(flags.can_manage)
        .bind(flags.can_view_analytics)
        .bind(flags.can_chat)
        .bind(flags.can_train_kb)
        .bind(flags.can_delete_data)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get(user_id, bot_id).await?.ok_or_else(|| {
            crate::db::error::DbError::Internal("Grant row missing after upsert".to_string())
        })
    }

    async fn get(&self, user_id: Uuid, bot_id: Uuid) -> DbResult<Option<BotUserGrant>> {
        let result = sqlx::query(&format!(
            "SELECT {} FROM bot_user_grants WHERE user_id = ? AND bot_id = ?",
            GRANT_COLUMNS
        ))
        .bind(user_id.to_string())
        .bind(bot_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        result.as_ref().map(grant_from_row).transpose()
    }

    async fn list_for_bot(&self, bot_id: Uuid) -> DbResult<Vec<BotUserGrant>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bot_user_grants WHERE bot_id = ? ORDER BY granted_at, user_id",
            GRANT_COLUMNS
        ))
        .bind(bot_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(grant_from_row).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<BotUserGrant>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM bot_user_grants WHERE user_id = ? ORDER BY granted_at, bot_id",
            GRANT_COLUMNS
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(grant_from_row).collect()
    }

    async fn remove(&self, user_id: Uuid, bot_id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM bot_user_grants WHERE user_id = ? AND bot_id = ?")
            .bind(user_id.to_string())
            .bind(bot_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
