use async_trait::async_trait;
use uuid::Uuid;

use super::ListParams;
use crate::{
    db::error::DbResult,
    models::{Conversation, CreateConversation, UpdateConversation},
    tenancy::TenantScope,
};

/// Conversations carry no tenant column; the scope is applied through a
/// join on the owning bot.
#[async_trait]
pub trait ConversationRepo: Send + Sync {
    /// Create a conversation under a bot.
    async fn create(&self, bot_id: Uuid, input: CreateConversation) -> DbResult<Conversation>;

    /// Get a conversation by its ID within the scope.
    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<Conversation>>;

    /// List a bot's conversations visible under the scope.
    async fn list_by_bot(
        &self,
        scope: &TenantScope,
        bot_id: Uuid,
        params: ListParams,
    ) -> DbResult<Vec<Conversation>>;

    /// List conversations assigned to a user, visible under the scope.
    async fn list_assigned_to(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        params: ListParams,
    ) -> DbResult<Vec<Conversation>>;

    /// Update status or assignment within the scope.
    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateConversation,
    ) -> DbResult<Conversation>;

    /// Delete a conversation within the scope.
    async fn delete(&self, scope: &TenantScope, id: Uuid) -> DbResult<()>;
}
