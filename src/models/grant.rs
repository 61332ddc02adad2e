use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-(user, bot) capability grant.
///
/// At most one row exists per pair; the absence of a row is the canonical
/// "nothing granted" state, never an error. Revoking every flag keeps the
/// row (with its original `granted_at`) so the grant history stays
/// attributable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotUserGrant {
    pub user_id: Uuid,
    pub bot_id: Uuid,
    pub can_manage: bool,
    pub can_view_analytics: bool,
    pub can_chat: bool,
    pub can_train_kb: bool,
    pub can_delete_data: bool,
    pub granted_at: DateTime<Utc>,
}

impl BotUserGrant {
    /// Whether any capability flag is set.
    pub fn has_any(&self) -> bool {
        self.can_manage
            || self.can_view_analytics
            || self.can_chat
            || self.can_train_kb
            || self.can_delete_data
    }
}

/// Desired flag state for a grant upsert.
///
/// Applied as a single atomic insert-or-update; concurrent writers to the
/// same (user, bot) pair resolve last-write-wins.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct GrantFlags {
    #[serde(default)]
    pub can_manage: bool,
    #[serde(default)]
    pub can_view_analytics: bool,
    #[serde(default)]
    pub can_chat: bool,
    #[serde(default)]
    pub can_train_kb: bool,
    #[serde(default)]
    pub can_delete_data: bool,
}

impl GrantFlags {
    /// All five capabilities granted.
    pub fn all() -> Self {
        Self {
            can_manage: true,
            can_view_analytics: true,
            can_chat: true,
            can_train_kb: true,
            can_delete_data: true,
        }
    }

    /// All five capabilities revoked.
    pub fn none() -> Self {
        Self::default()
    }
}
