use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{BotUserGrant, GrantFlags},
};

/// Storage for per-(user, bot) capability grants.
///
/// A missing row is the canonical "nothing granted" state; lookups return
/// `None` rather than an error. Grant rows live independently of the bot
/// and user lifecycles: removing a grant deletes neither entity.
#[async_trait]
pub trait BotGrantRepo: Send + Sync {
    /// Insert or update the grant row for (user, bot) in one atomic
    /// statement. Keeps the original `granted_at` on update; concurrent
    /// writers resolve last-write-wins.
    async fn upsert(&self, user_id: Uuid, bot_id: Uuid, flags: GrantFlags)
    -> DbResult<BotUserGrant>;

    /// Get the grant row for (user, bot), if one exists.
    async fn get(&self, user_id: Uuid, bot_id: Uuid) -> DbResult<Option<BotUserGrant>>;

    /// List all grant rows for a bot.
    async fn list_for_bot(&self, bot_id: Uuid) -> DbResult<Vec<BotUserGrant>>;

    /// List all grant rows held by a user.
    async fn list_for_user(&self, user_id: Uuid) -> DbResult<Vec<BotUserGrant>>;

    /// Delete the grant row for (user, bot). Deleting a missing row is not
    /// an error.
    async fn remove(&self, user_id: Uuid, bot_id: Uuid) -> DbResult<()>;
}
