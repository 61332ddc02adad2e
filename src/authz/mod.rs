//! Authorization: roles, per-bot capability grants, and entity policies.
//!
//! The decision flow for a protected operation:
//! 1. The tenant gate has already validated and bound the request's tenant.
//! 2. The route layer asks the matching policy (or a named gate) whether
//!    the actor may perform the action.
//! 3. The policy composes the actor's global role, the tenant-equality
//!    check, and the per-bot grant flags into a single allow/deny.
//!
//! Decisions are pure functions over already-loaded records; the
//! [`crate::services::AccessService`] pairs them with grant lookups for
//! call sites that start from ids.

mod capability;
mod error;
pub mod gates;
mod policy;

pub use capability::{BotCapability, resolve_capability};
pub use error::AuthzError;
pub use policy::{
    BotAction, BotPolicy, ConversationAction, ConversationPolicy, KnowledgeBaseAction,
    KnowledgeBasePolicy, view_any,
};
