//! Storage-backed access decisions.
//!
//! The policies in [`crate::authz`] are pure functions over loaded
//! records. This service pairs them with the lookups call sites actually
//! start from: a user and a resource id. Denials come back as
//! [`AuthzError::AccessDenied`], the uniform forbidden outcome the route
//! layer turns into a 403.

use std::sync::Arc;

use uuid::Uuid;

use super::AccessError;
use crate::{
    authz::{
        AuthzError, BotAction, BotPolicy, ConversationAction, ConversationPolicy,
        KnowledgeBaseAction, KnowledgeBasePolicy, gates,
    },
    db::{DbError, DbPool},
    models::{Bot, BotUserGrant, User},
    tenancy::TenantScope,
};

/// Decision front-end over the entity policies and capability gates.
#[derive(Clone)]
pub struct AccessService {
    db: Arc<DbPool>,
}

impl AccessService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Load a bot by id regardless of tenant.
    ///
    /// The authorization layer must see the true owning bot to compare
    /// tenants; the policy itself performs the tenant check, so this is
    /// the one place an unscoped bot read is correct.
    async fn load_bot(&self, bot_id: Uuid) -> Result<Bot, AccessError> {
        self.db
            .bots()
            .get_by_id(&TenantScope::Unscoped, bot_id)
            .await?
            .ok_or(AccessError::Db(DbError::NotFound))
    }

    /// Fetch the grant row relevant to a (user, bot) decision.
    ///
    /// Roles that never consult grants skip the lookup.
    async fn load_grant(
        &self,
        user: &User,
        bot_id: Uuid,
    ) -> Result<Option<BotUserGrant>, AccessError> {
        if user.role.is_super_admin() || user.role.is_admin() || user.role.is_supervisor() {
            return Ok(None);
        }
        Ok(self.db.bot_grants().get(user.id, bot_id).await?)
    }

    /// Require `action` on a bot, or fail with the uniform forbidden error.
    pub async fn require_bot(
        &self,
        user: &User,
        bot_id: Uuid,
        action: BotAction,
    ) -> Result<(), AccessError> {
        let bot = self.load_bot(bot_id).await?;
        let grant = self.load_grant(user, bot.id).await?;
        let allowed = BotPolicy::allows(user, &bot, grant.as_ref(), action);
        tracing::debug!(
            user_id = %user.id,
            bot_id = %bot.id,
            action = %action,
            allowed,
            "Bot policy decision"
        );
        if allowed {
            Ok(())
        } else {
            Err(AuthzError::access_denied(format!("bots.{}", action)).into())
        }
    }

    /// Require `action` on a conversation, resolving the tenant through
    /// the owning bot.
    pub async fn require_conversation(
        &self,
        user: &User,
        conversation_id: Uuid,
        action: ConversationAction,
    ) -> Result<(), AccessError> {
        let conversation = self
            .db
            .conversations()
            .get_by_id(&TenantScope::Unscoped, conversation_id)
            .await?
            .ok_or(AccessError::Db(DbError::NotFound))?;
        let bot = self.load_bot(conversation.bot_id).await?;
        let grant = self.load_grant(user, bot.id).await?;
        let allowed = ConversationPolicy::allows(user, &bot, &conversation, grant.as_ref(), action);
        tracing::debug!(
            user_id = %user.id,
            conversation_id = %conversation.id,
            action = %action,
            allowed,
            "Conversation policy decision"
        );
        if allowed {
            Ok(())
        } else {
            Err(AuthzError::access_denied(format!("conversations.{}", action)).into())
        }
    }

    /// Require `action` on a knowledge base, resolving the tenant through
    /// the owning bot.
    pub async fn require_knowledge_base(
        &self,
        user: &User,
        kb_id: Uuid,
        action: KnowledgeBaseAction,
    ) -> Result<(), AccessError> {
        let kb = self
            .db
            .knowledge_bases()
            .get_by_id(&TenantScope::Unscoped, kb_id)
            .await?
            .ok_or(AccessError::Db(DbError::NotFound))?;
        let bot = self.load_bot(kb.bot_id).await?;
        let grant = self.load_grant(user, bot.id).await?;
        let allowed = KnowledgeBasePolicy::allows(user, &bot, &kb, grant.as_ref(), action);
        tracing::debug!(
            user_id = %user.id,
            knowledge_base_id = %kb.id,
            action = %action,
            allowed,
            "Knowledge base policy decision"
        );
        if allowed {
            Ok(())
        } else {
            Err(AuthzError::access_denied(format!("knowledge_bases.{}", action)).into())
        }
    }

    /// Whether the user may access the bot at all (any role path or any
    /// grant row).
    pub async fn can_access_bot(&self, user: &User, bot_id: Uuid) -> Result<bool, AccessError> {
        let bot = self.load_bot(bot_id).await?;
        // access_bot counts an all-false row as attachment, so the lookup
        // cannot be skipped for any role.
        let grant = self.db.bot_grants().get(user.id, bot.id).await?;
        Ok(gates::access_bot(user, &bot, grant.as_ref()))
    }

    /// Whether the user may manage the bot (settings, deletion, grants).
    pub async fn can_manage_bot(&self, user: &User, bot_id: Uuid) -> Result<bool, AccessError> {
        let bot = self.load_bot(bot_id).await?;
        let grant = self.load_grant(user, bot.id).await?;
        Ok(gates::manage_bot(user, &bot, grant.as_ref()))
    }
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        db::tests::{TestDb, conversation_input},
        models::{GrantFlags, UserRole},
    };

    fn service(ctx: &TestDb) -> AccessService {
        AccessService::new(Arc::new(crate::db::DbPool::from_sqlite(ctx.pool.clone())))
    }

    fn is_denied(result: Result<(), AccessError>) -> bool {
        matches!(result, Err(AccessError::Authz(AuthzError::AccessDenied(_))))
    }

    #[tokio::test]
    async fn test_admin_updates_bot_in_own_tenant() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let access = service(&ctx);

        access
            .require_bot(&admin, bot.id, BotAction::Update)
            .await
            .expect("Admin should update bots in their tenant");
    }

    #[tokio::test]
    async fn test_admin_denied_across_tenants_despite_grant() {
        let ctx = TestDb::new().await;
        let acme = ctx.create_tenant("acme").await;
        let globex = ctx.create_tenant("globex").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(acme.id), "admin@acme.io")
            .await;
        let foreign_bot = ctx.create_bot(globex.id, "Helpdesk").await;
        // A stray grant row must not cross the tenant boundary.
        ctx.bot_grants()
            .upsert(admin.id, foreign_bot.id, GrantFlags::all())
            .await
            .expect("Upsert should succeed");
        let access = service(&ctx);

        let result = access
            .require_bot(&admin, foreign_bot.id, BotAction::Update)
            .await;
        assert!(is_denied(result));
    }

    #[tokio::test]
    async fn test_chat_grant_allows_reply_denies_delete() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "agent@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let conversation = ctx
            .conversations()
            .create(bot.id, conversation_input())
            .await
            .expect("Create should succeed");
        ctx.bot_grants()
            .upsert(
                agent.id,
                bot.id,
                GrantFlags {
                    can_chat: true,
                    ..GrantFlags::none()
                },
            )
            .await
            .expect("Upsert should succeed");
        let access = service(&ctx);

        access
            .require_conversation(&agent, conversation.id, ConversationAction::Reply)
            .await
            .expect("Chat grant should allow replying");
        let result = access
            .require_conversation(&agent, conversation.id, ConversationAction::Delete)
            .await;
        assert!(is_denied(result));
    }

    #[tokio::test]
    async fn test_assignment_allows_view_and_reply_denies_assign() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "agent@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let conversation = ctx
            .conversations()
            .create(bot.id, conversation_input())
            .await
            .expect("Create should succeed");
        ctx.conversations()
            .update(
                &TenantScope::tenant(tenant.id),
                conversation.id,
                crate::models::UpdateConversation {
                    status: None,
                    assigned_user_id: Some(agent.id),
                },
            )
            .await
            .expect("Update should succeed");
        let access = service(&ctx);

        // No grant row at all: assignment alone carries view and reply.
        access
            .require_conversation(&agent, conversation.id, ConversationAction::View)
            .await
            .expect("Assignee should view");
        access
            .require_conversation(&agent, conversation.id, ConversationAction::Reply)
            .await
            .expect("Assignee should reply");
        let result = access
            .require_conversation(&agent, conversation.id, ConversationAction::Assign)
            .await;
        assert!(is_denied(result));
    }

    #[tokio::test]
    async fn test_super_admin_allowed_everywhere() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let root = ctx.create_user(UserRole::SuperAdmin, None, "root@bothub.io").await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let access = service(&ctx);

        for action in [
            BotAction::View,
            BotAction::Update,
            BotAction::Delete,
            BotAction::ForceDelete,
            BotAction::TrainKnowledgeBase,
        ] {
            access
                .require_bot(&root, bot.id, action)
                .await
                .unwrap_or_else(|_| panic!("Super admin denied {}", action));
        }
    }

    #[tokio::test]
    async fn test_missing_bot_is_not_found_not_forbidden() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;
        let access = service(&ctx);

        let result = access
            .require_bot(&admin, Uuid::new_v4(), BotAction::View)
            .await;
        assert!(matches!(result, Err(AccessError::Db(DbError::NotFound))));
    }

    #[tokio::test]
    async fn test_access_bot_gate_counts_empty_grant_row() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let viewer = ctx
            .create_user(UserRole::Viewer, Some(tenant.id), "viewer@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let access = service(&ctx);

        assert!(!access.can_access_bot(&viewer, bot.id).await.unwrap());

        ctx.bot_grants()
            .upsert(viewer.id, bot.id, GrantFlags::none())
            .await
            .expect("Upsert should succeed");
        assert!(access.can_access_bot(&viewer, bot.id).await.unwrap());
    }
}
