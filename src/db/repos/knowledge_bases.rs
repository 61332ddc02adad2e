use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::error::DbResult,
    models::{CreateKnowledgeBase, KnowledgeBase, UpdateKnowledgeBase},
    tenancy::TenantScope,
};

/// Knowledge bases are one-to-one with bots and inherit the bot's tenant;
/// the scope is applied through a join on the owning bot.
#[async_trait]
pub trait KnowledgeBaseRepo: Send + Sync {
    /// Create the knowledge base for a bot. Conflicts if the bot already
    /// has one.
    async fn create(&self, bot_id: Uuid, input: CreateKnowledgeBase) -> DbResult<KnowledgeBase>;

    /// Get a knowledge base by its ID within the scope.
    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<KnowledgeBase>>;

    /// Get a bot's knowledge base within the scope.
    async fn get_by_bot(&self, scope: &TenantScope, bot_id: Uuid)
    -> DbResult<Option<KnowledgeBase>>;

    /// Update a knowledge base within the scope.
    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateKnowledgeBase,
    ) -> DbResult<KnowledgeBase>;

    /// Delete a knowledge base within the scope.
    async fn delete(&self, scope: &TenantScope, id: Uuid) -> DbResult<()>;
}
