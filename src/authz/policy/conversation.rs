use std::fmt;

use super::preamble;
use crate::{
    authz::capability::{BotCapability, resolve_capability},
    models::{Bot, BotUserGrant, Conversation, User},
};

/// Actions a policy decision can be requested for on a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationAction {
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
    Reply,
    Assign,
}

impl ConversationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "force_delete",
            Self::Reply => "reply",
            Self::Assign => "assign",
        }
    }
}

impl fmt::Display for ConversationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision table for conversation actions.
///
/// A conversation has no tenant column of its own; callers pass the owning
/// bot, and the tenant check runs against the bot's tenant.
pub struct ConversationPolicy;

impl ConversationPolicy {
    pub fn view_any(user: &User) -> bool {
        super::view_any(user)
    }

    pub fn create(user: &User) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        user.role.is_admin()
    }

    /// Decide `action` for `user` against `conversation` owned by `bot`.
    pub fn allows(
        user: &User,
        bot: &Bot,
        conversation: &Conversation,
        grant: Option<&BotUserGrant>,
        action: ConversationAction,
    ) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        if !user.belongs_to(bot.tenant_id) {
            return false;
        }

        // Assignment alone grants view and reply, independent of any flags.
        let assigned = conversation.is_assigned_to(user.id);

        match action {
            ConversationAction::View => {
                assigned
                    || user.role.is_admin()
                    || user.role.is_supervisor()
                    || resolve_capability(user, bot, grant, BotCapability::Chat)
            }
            ConversationAction::Create => user.role.is_admin(),
            ConversationAction::Update | ConversationAction::Delete => {
                resolve_capability(user, bot, grant, BotCapability::Manage)
            }
            ConversationAction::Restore => user.role.is_admin(),
            ConversationAction::ForceDelete => false,
            ConversationAction::Reply => {
                assigned || resolve_capability(user, bot, grant, BotCapability::Chat)
            }
            ConversationAction::Assign => {
                user.role.is_admin()
                    || user.role.is_supervisor()
                    || resolve_capability(user, bot, grant, BotCapability::Manage)
            }
        }
    }
}
