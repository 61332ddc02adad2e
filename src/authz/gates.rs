//! Named capability gates.
//!
//! Single yes/no checks for call sites outside entity-policy dispatch,
//! such as deciding whether to render a UI affordance. Built from the same
//! primitives as the policies.

use uuid::Uuid;

use super::capability::{BotCapability, resolve_capability};
use crate::models::{Bot, BotUserGrant, User};

/// Whether the user may manage the bot (settings, deletion, grants).
pub fn manage_bot(user: &User, bot: &Bot, grant: Option<&BotUserGrant>) -> bool {
    resolve_capability(user, bot, grant, BotCapability::Manage)
}

/// Whether the user may take part in the bot's conversations.
pub fn chat_in_bot(user: &User, bot: &Bot, grant: Option<&BotUserGrant>) -> bool {
    resolve_capability(user, bot, grant, BotCapability::Chat)
}

/// Whether the user may read the bot's analytics.
pub fn view_bot_analytics(user: &User, bot: &Bot, grant: Option<&BotUserGrant>) -> bool {
    resolve_capability(user, bot, grant, BotCapability::ViewAnalytics)
}

/// Whether the user may train the bot's knowledge base.
pub fn train_bot_kb(user: &User, bot: &Bot, grant: Option<&BotUserGrant>) -> bool {
    resolve_capability(user, bot, grant, BotCapability::TrainKb)
}

/// Whether the user and a resource share a tenant, with the super-admin
/// override applied.
pub fn same_tenant(user: &User, resource_tenant_id: Uuid) -> bool {
    user.role.is_super_admin() || user.belongs_to(resource_tenant_id)
}

/// Whether the user may access the bot at all.
///
/// admin and supervisor roles reach every bot in their tenant; anyone else
/// needs a grant row for the bot, whatever its flags say.
pub fn access_bot(user: &User, bot: &Bot, grant: Option<&BotUserGrant>) -> bool {
    if user.role.is_super_admin() {
        return true;
    }
    if !user.belongs_to(bot.tenant_id) {
        return false;
    }
    if user.role.is_admin() || user.role.is_supervisor() {
        return true;
    }
    grant.is_some()
}
