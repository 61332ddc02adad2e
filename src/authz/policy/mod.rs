//! Per-entity authorization policies.
//!
//! One decision module per protected entity type, each exposing a pure
//! boolean decision per action. Every policy follows the same shape:
//! 1. super_admin allows everything (also enforced by the platform-wide
//!    pre-check, but each policy must hold when invoked directly).
//! 2. Inactive actors are denied.
//! 3. Cross-tenant access is denied before any role or grant logic runs.
//! 4. admin (same tenant) carries full tenant authority, minus the
//!    super-admin-only actions.
//! 5. supervisor (same tenant) gets read/view/assign-adjacent actions.
//! 6. Everything else falls back to the per-bot grant flags.
//!
//! Listing (`view_any`) is gated by role alone; which rows a listing
//! actually returns is the tenant scope filter's job, not the policy's.

mod bot;
mod conversation;
mod knowledge_base;

pub use bot::{BotAction, BotPolicy};
pub use conversation::{ConversationAction, ConversationPolicy};
pub use knowledge_base::{KnowledgeBaseAction, KnowledgeBasePolicy};

use crate::models::User;

/// Whether `user` may invoke a listing endpoint at all.
///
/// Any authenticated, active holder of a defined role qualifies; the
/// tenant scope filter still bounds the visible row set.
pub fn view_any(user: &User) -> bool {
    user.role.is_super_admin() || user.is_active
}

/// Shared preamble for resource-level decisions: the super-admin override
/// and the active-account check. Returns `Some(decision)` when the
/// preamble already decides the outcome.
fn preamble(user: &User) -> Option<bool> {
    if user.role.is_super_admin() {
        return Some(true);
    }
    if !user.is_active {
        return Some(false);
    }
    None
}
