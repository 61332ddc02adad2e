use std::fmt;

use super::preamble;
use crate::{
    authz::capability::{BotCapability, resolve_capability},
    models::{Bot, BotUserGrant, User},
};

/// Actions a policy decision can be requested for on a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotAction {
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
    Chat,
    ViewAnalytics,
    TrainKnowledgeBase,
    DeleteData,
}

impl BotAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "force_delete",
            Self::Chat => "chat",
            Self::ViewAnalytics => "view_analytics",
            Self::TrainKnowledgeBase => "train_knowledge_base",
            Self::DeleteData => "delete_data",
        }
    }
}

impl fmt::Display for BotAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision table for bot actions.
pub struct BotPolicy;

impl BotPolicy {
    /// Whether `user` may invoke bot listing. Rows are bounded by the
    /// tenant scope filter.
    pub fn view_any(user: &User) -> bool {
        super::view_any(user)
    }

    /// Whether `user` may create bots in their tenant.
    ///
    /// Creation is an administrative act, not a grantable capability, so
    /// this takes no bot and no grant.
    pub fn create(user: &User) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        user.role.is_admin()
    }

    /// Decide `action` for `user` against `bot`.
    ///
    /// `grant` is the user's BotUserGrant row for this bot, if one exists.
    pub fn allows(user: &User, bot: &Bot, grant: Option<&BotUserGrant>, action: BotAction) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        // Tenant mismatch denies before any role or grant logic.
        if !user.belongs_to(bot.tenant_id) {
            return false;
        }

        match action {
            BotAction::View => {
                user.role.is_admin()
                    || user.role.is_supervisor()
                    || grant.is_some_and(BotUserGrant::has_any)
            }
            BotAction::Create => user.role.is_admin(),
            BotAction::Update | BotAction::Delete => {
                resolve_capability(user, bot, grant, BotCapability::Manage)
            }
            BotAction::Restore => user.role.is_admin(),
            // Purging a bot is irreversible; only the platform may do it.
            BotAction::ForceDelete => false,
            BotAction::Chat => resolve_capability(user, bot, grant, BotCapability::Chat),
            BotAction::ViewAnalytics => {
                resolve_capability(user, bot, grant, BotCapability::ViewAnalytics)
            }
            BotAction::TrainKnowledgeBase => {
                resolve_capability(user, bot, grant, BotCapability::TrainKb)
            }
            BotAction::DeleteData => {
                resolve_capability(user, bot, grant, BotCapability::DeleteData)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;
    use crate::models::{GrantFlags, UserRole};

    fn bot(tenant_id: Uuid) -> Bot {
        let now = Utc::now();
        Bot {
            id: Uuid::new_v4(),
            tenant_id,
            name: "Support".to_string(),
            phone_number: "+5511999887766".to_string(),
            ai_config: serde_json::json!({}),
            is_active: true,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(role: UserRole, tenant_id: Option<Uuid>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            tenant_id,
            email: "user@acme.io".to_string(),
            name: "User".to_string(),
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn grant(user_id: Uuid, bot_id: Uuid, flags: GrantFlags) -> BotUserGrant {
        BotUserGrant {
            user_id,
            bot_id,
            can_manage: flags.can_manage,
            can_view_analytics: flags.can_view_analytics,
            can_chat: flags.can_chat,
            can_train_kb: flags.can_train_kb,
            can_delete_data: flags.can_delete_data,
            granted_at: Utc::now(),
        }
    }

    const ALL_ACTIONS: [BotAction; 10] = [
        BotAction::View,
        BotAction::Create,
        BotAction::Update,
        BotAction::Delete,
        BotAction::Restore,
        BotAction::ForceDelete,
        BotAction::Chat,
        BotAction::ViewAnalytics,
        BotAction::TrainKnowledgeBase,
        BotAction::DeleteData,
    ];

    #[test]
    fn test_super_admin_allows_everything() {
        let b = bot(Uuid::new_v4());
        let actor = user(UserRole::SuperAdmin, None);
        for action in ALL_ACTIONS {
            assert!(BotPolicy::allows(&actor, &b, None, action), "{action}");
        }
    }

    #[test]
    fn test_cross_tenant_denies_everything() {
        let b = bot(Uuid::new_v4());
        let actor = user(UserRole::Admin, Some(Uuid::new_v4()));
        let g = grant(actor.id, b.id, GrantFlags::all());
        for action in ALL_ACTIONS {
            assert!(!BotPolicy::allows(&actor, &b, Some(&g), action), "{action}");
        }
    }

    #[test]
    fn test_admin_allows_all_but_force_delete() {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let actor = user(UserRole::Admin, Some(tenant_id));
        for action in ALL_ACTIONS {
            let expected = action != BotAction::ForceDelete;
            assert_eq!(BotPolicy::allows(&actor, &b, None, action), expected, "{action}");
        }
    }

    // Scenario: tenant-T admin updating a tenant-T bot.
    #[test]
    fn test_admin_updates_own_tenant_bot() {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let actor = user(UserRole::Admin, Some(tenant_id));
        assert!(BotPolicy::allows(&actor, &b, None, BotAction::Update));
    }

    #[rstest]
    #[case(BotAction::View, true)]
    #[case(BotAction::ViewAnalytics, true)]
    #[case(BotAction::Chat, true)]
    #[case(BotAction::Create, false)]
    #[case(BotAction::Update, false)]
    #[case(BotAction::Delete, false)]
    #[case(BotAction::TrainKnowledgeBase, false)]
    #[case(BotAction::DeleteData, false)]
    fn test_supervisor_decision_table(#[case] action: BotAction, #[case] expected: bool) {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let actor = user(UserRole::Supervisor, Some(tenant_id));
        assert_eq!(BotPolicy::allows(&actor, &b, None, action), expected);
    }

    #[test]
    fn test_agent_without_grant_sees_nothing() {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let actor = user(UserRole::Agent, Some(tenant_id));
        for action in ALL_ACTIONS {
            assert!(!BotPolicy::allows(&actor, &b, None, action), "{action}");
        }
    }

    #[test]
    fn test_manage_grant_covers_update_and_delete_only() {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let actor = user(UserRole::Agent, Some(tenant_id));
        let g = grant(
            actor.id,
            b.id,
            GrantFlags {
                can_manage: true,
                ..GrantFlags::none()
            },
        );

        assert!(BotPolicy::allows(&actor, &b, Some(&g), BotAction::Update));
        assert!(BotPolicy::allows(&actor, &b, Some(&g), BotAction::Delete));
        assert!(BotPolicy::allows(&actor, &b, Some(&g), BotAction::View));
        assert!(!BotPolicy::allows(&actor, &b, Some(&g), BotAction::Create));
        assert!(!BotPolicy::allows(&actor, &b, Some(&g), BotAction::Restore));
        assert!(!BotPolicy::allows(&actor, &b, Some(&g), BotAction::ForceDelete));
        assert!(!BotPolicy::allows(&actor, &b, Some(&g), BotAction::Chat));
    }

    #[test]
    fn test_inactive_user_denied() {
        let tenant_id = Uuid::new_v4();
        let b = bot(tenant_id);
        let mut actor = user(UserRole::Admin, Some(tenant_id));
        actor.is_active = false;
        assert!(!BotPolicy::allows(&actor, &b, None, BotAction::View));
    }

    #[test]
    fn test_create_is_admin_only() {
        assert!(BotPolicy::create(&user(UserRole::Admin, Some(Uuid::new_v4()))));
        assert!(BotPolicy::create(&user(UserRole::SuperAdmin, None)));
        assert!(!BotPolicy::create(&user(UserRole::Supervisor, Some(Uuid::new_v4()))));
        assert!(!BotPolicy::create(&user(UserRole::Agent, Some(Uuid::new_v4()))));
        assert!(!BotPolicy::create(&user(UserRole::Viewer, Some(Uuid::new_v4()))));
    }
}
