//! Per-bot capability resolution.
//!
//! Answers the five capability questions for a (user, bot) pair, composing
//! the user's global role with the optional [`BotUserGrant`] row. The
//! resolver is pure: the caller supplies the grant row it already looked
//! up, which keeps the decision testable without storage.

use std::fmt;

use crate::models::{Bot, BotUserGrant, User};

/// The five independent per-bot capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCapability {
    Manage,
    ViewAnalytics,
    Chat,
    TrainKb,
    DeleteData,
}

impl BotCapability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manage => "manage",
            Self::ViewAnalytics => "view_analytics",
            Self::Chat => "chat",
            Self::TrainKb => "train_kb",
            Self::DeleteData => "delete_data",
        }
    }
}

impl fmt::Display for BotCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve one capability for `user` on `bot`.
///
/// Resolution order:
/// 1. super_admin: unconditionally granted.
/// 2. cross-tenant actors: unconditionally denied.
/// 3. admin (same tenant): all five capabilities.
/// 4. supervisor (same tenant): view-analytics and chat only.
/// 5. everyone else: the matching grant flag, false when no row exists.
pub fn resolve_capability(
    user: &User,
    bot: &Bot,
    grant: Option<&BotUserGrant>,
    capability: BotCapability,
) -> bool {
    if user.role.is_super_admin() {
        return true;
    }
    if !user.belongs_to(bot.tenant_id) {
        return false;
    }
    if user.role.is_admin() {
        return true;
    }
    if user.role.is_supervisor() {
        return matches!(
            capability,
            BotCapability::ViewAnalytics | BotCapability::Chat
        );
    }

    let Some(grant) = grant else {
        return false;
    };
    match capability {
        BotCapability::Manage => grant.can_manage,
        BotCapability::ViewAnalytics => grant.can_view_analytics,
        BotCapability::Chat => grant.can_chat,
        BotCapability::TrainKb => grant.can_train_kb,
        BotCapability::DeleteData => grant.can_delete_data,
    }
}
