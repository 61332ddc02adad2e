use std::fmt;

use super::preamble;
use crate::{
    authz::capability::{BotCapability, resolve_capability},
    models::{Bot, BotUserGrant, KnowledgeBase, User},
};

/// Actions a policy decision can be requested for on a knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeBaseAction {
    View,
    Create,
    Update,
    Delete,
    Restore,
    ForceDelete,
    Train,
    ViewDocuments,
    DeleteDocuments,
    DownloadDocuments,
    ViewMetrics,
}

impl KnowledgeBaseAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Restore => "restore",
            Self::ForceDelete => "force_delete",
            Self::Train => "train",
            Self::ViewDocuments => "view_documents",
            Self::DeleteDocuments => "delete_documents",
            Self::DownloadDocuments => "download_documents",
            Self::ViewMetrics => "view_metrics",
        }
    }
}

impl fmt::Display for KnowledgeBaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Decision table for knowledge base actions.
///
/// A knowledge base belongs to exactly one bot; its tenant is the bot's
/// tenant, so callers pass the owning bot alongside the knowledge base.
pub struct KnowledgeBasePolicy;

impl KnowledgeBasePolicy {
    pub fn view_any(user: &User) -> bool {
        super::view_any(user)
    }

    pub fn create(user: &User) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        user.role.is_admin()
    }

    /// Decide `action` for `user` against `kb` owned by `bot`.
    pub fn allows(
        user: &User,
        bot: &Bot,
        _kb: &KnowledgeBase,
        grant: Option<&BotUserGrant>,
        action: KnowledgeBaseAction,
    ) -> bool {
        if let Some(decision) = preamble(user) {
            return decision;
        }
        if !user.belongs_to(bot.tenant_id) {
            return false;
        }

        match action {
            KnowledgeBaseAction::View
            | KnowledgeBaseAction::ViewDocuments
            | KnowledgeBaseAction::DownloadDocuments => {
                resolve_capability(user, bot, grant, BotCapability::Manage)
                    || resolve_capability(user, bot, grant, BotCapability::TrainKb)
                    || resolve_capability(user, bot, grant, BotCapability::ViewAnalytics)
                    || resolve_capability(user, bot, grant, BotCapability::DeleteData)
            }
            KnowledgeBaseAction::Create => user.role.is_admin(),
            KnowledgeBaseAction::Update | KnowledgeBaseAction::Delete => {
                resolve_capability(user, bot, grant, BotCapability::Manage)
            }
            KnowledgeBaseAction::Restore => user.role.is_admin(),
            KnowledgeBaseAction::ForceDelete => false,
            KnowledgeBaseAction::Train => {
                resolve_capability(user, bot, grant, BotCapability::TrainKb)
            }
            KnowledgeBaseAction::DeleteDocuments => {
                resolve_capability(user, bot, grant, BotCapability::DeleteData)
            }
            KnowledgeBaseAction::ViewMetrics => {
                resolve_capability(user, bot, grant, BotCapability::ViewAnalytics)
            }
        }
    }
}
