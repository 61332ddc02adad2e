//! Grant lifecycle operations.
//!
//! Creating, updating, and removing [`BotUserGrant`] rows. Every mutation
//! requires the acting user to hold manage on the target bot (admin,
//! super admin, or a `can_manage` grant).

use std::sync::Arc;

use uuid::Uuid;

use super::{AccessError, AccessService};
use crate::{
    authz::AuthzError,
    db::DbPool,
    models::{BotUserGrant, GrantFlags, User},
};

/// Service layer for per-bot capability grants.
#[derive(Clone)]
pub struct GrantService {
    db: Arc<DbPool>,
    access: AccessService,
}

impl GrantService {
    pub fn new(db: Arc<DbPool>) -> Self {
        let access = AccessService::new(Arc::clone(&db));
        Self { db, access }
    }

    async fn require_manage(&self, acting: &User, bot_id: Uuid) -> Result<(), AccessError> {
        if self.access.can_manage_bot(acting, bot_id).await? {
            Ok(())
        } else {
            Err(AuthzError::access_denied("bots.manage_grants").into())
        }
    }

    /// Set the grant flags for (user, bot) as one atomic upsert.
    ///
    /// Also used to revoke individual capabilities: pass the desired final
    /// flag state. Concurrent writers resolve last-write-wins.
    pub async fn set_flags(
        &self,
        acting: &User,
        target_user_id: Uuid,
        bot_id: Uuid,
        flags: GrantFlags,
    ) -> Result<BotUserGrant, AccessError> {
        self.require_manage(acting, bot_id).await?;
        let grant = self.db.bot_grants().upsert(target_user_id, bot_id, flags).await?;
        tracing::debug!(
            acting_user_id = %acting.id,
            target_user_id = %target_user_id,
            bot_id = %bot_id,
            "Grant flags updated"
        );
        Ok(grant)
    }

    /// Revoke every capability but keep the row, preserving when access
    /// was first granted.
    pub async fn revoke_all(
        &self,
        acting: &User,
        target_user_id: Uuid,
        bot_id: Uuid,
    ) -> Result<BotUserGrant, AccessError> {
        self.set_flags(acting, target_user_id, bot_id, GrantFlags::none())
            .await
    }

    /// Detach the grant row entirely. Deletes neither the user nor the bot.
    pub async fn remove(
        &self,
        acting: &User,
        target_user_id: Uuid,
        bot_id: Uuid,
    ) -> Result<(), AccessError> {
        self.require_manage(acting, bot_id).await?;
        self.db.bot_grants().remove(target_user_id, bot_id).await?;
        tracing::debug!(
            acting_user_id = %acting.id,
            target_user_id = %target_user_id,
            bot_id = %bot_id,
            "Grant removed"
        );
        Ok(())
    }

    /// Get the grant row for (user, bot), if one exists. A missing row is
    /// the normal "nothing granted" state.
    pub async fn get(
        &self,
        user_id: Uuid,
        bot_id: Uuid,
    ) -> Result<Option<BotUserGrant>, AccessError> {
        Ok(self.db.bot_grants().get(user_id, bot_id).await?)
    }

    /// List all grants on a bot. Requires manage on the bot.
    pub async fn list_for_bot(
        &self,
        acting: &User,
        bot_id: Uuid,
    ) -> Result<Vec<BotUserGrant>, AccessError> {
        self.require_manage(acting, bot_id).await?;
        Ok(self.db.bot_grants().list_for_bot(bot_id).await?)
    }
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{db::tests::TestDb, models::UserRole};

    fn service(ctx: &TestDb) -> GrantService {
        GrantService::new(Arc::new(crate::db::DbPool::from_sqlite(ctx.pool.clone())))
    }

    #[tokio::test]
    async fn test_admin_can_grant_and_revoke() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "agent@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let grants = service(&ctx);

        let grant = grants
            .set_flags(
                &admin,
                agent.id,
                bot.id,
                GrantFlags {
                    can_chat: true,
                    ..GrantFlags::none()
                },
            )
            .await
            .expect("Admin should grant");
        assert!(grant.can_chat);

        let revoked = grants
            .revoke_all(&admin, agent.id, bot.id)
            .await
            .expect("Admin should revoke");
        assert!(!revoked.has_any());
    }

    #[tokio::test]
    async fn test_agent_without_manage_cannot_grant() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "agent@acme.io")
            .await;
        let other = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "other@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let grants = service(&ctx);

        let result = grants
            .set_flags(&agent, other.id, bot.id, GrantFlags::all())
            .await;
        assert!(matches!(result, Err(AccessError::Authz(_))));
    }

    #[tokio::test]
    async fn test_manage_grantee_can_grant_others() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;
        let manager = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "manager@acme.io")
            .await;
        let other = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "other@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let grants = service(&ctx);

        grants
            .set_flags(
                &admin,
                manager.id,
                bot.id,
                GrantFlags {
                    can_manage: true,
                    ..GrantFlags::none()
                },
            )
            .await
            .expect("Admin should grant manage");

        // A can_manage holder may hand out grants on the same bot.
        grants
            .set_flags(
                &manager,
                other.id,
                bot.id,
                GrantFlags {
                    can_chat: true,
                    ..GrantFlags::none()
                },
            )
            .await
            .expect("Manage grantee should grant");
    }

    #[tokio::test]
    async fn test_cross_tenant_admin_cannot_grant() {
        let ctx = TestDb::new().await;
        let acme = ctx.create_tenant("acme").await;
        let globex = ctx.create_tenant("globex").await;
        let foreign_admin = ctx
            .create_user(UserRole::Admin, Some(globex.id), "admin@globex.io")
            .await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(acme.id), "agent@acme.io")
            .await;
        let bot = ctx.create_bot(acme.id, "Support").await;
        let grants = service(&ctx);

        let result = grants
            .set_flags(&foreign_admin, agent.id, bot.id, GrantFlags::all())
            .await;
        assert!(matches!(result, Err(AccessError::Authz(_))));
    }

    #[tokio::test]
    async fn test_super_admin_can_always_grant() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let root = ctx.create_user(UserRole::SuperAdmin, None, "root@bothub.io").await;
        let agent = ctx
            .create_user(UserRole::Agent, Some(tenant.id), "agent@acme.io")
            .await;
        let bot = ctx.create_bot(tenant.id, "Support").await;
        let grants = service(&ctx);

        grants
            .set_flags(&root, agent.id, bot.id, GrantFlags::all())
            .await
            .expect("Super admin should grant");
        grants
            .remove(&root, agent.id, bot.id)
            .await
            .expect("Super admin should remove");
    }
}
