use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::PHONE_REGEX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Open,
    Pending,
    Closed,
}

impl ConversationStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Closed => "closed",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "pending" => Some(Self::Pending),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A WhatsApp conversation handled by a bot.
///
/// Carries no tenant column of its own: its effective tenant is always the
/// owning bot's tenant, and every authorization or scoping decision
/// resolves through the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub bot_id: Uuid,
    /// Agent currently handling the conversation, if any.
    pub assigned_user_id: Option<Uuid>,
    pub contact_phone: String,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Whether the conversation is assigned to the given user.
    pub fn is_assigned_to(&self, user_id: Uuid) -> bool {
        self.assigned_user_id == Some(user_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateConversation {
    #[validate(regex(path = *PHONE_REGEX))]
    pub contact_phone: String,
    #[serde(default)]
    pub status: ConversationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateConversation {
    pub status: Option<ConversationStatus>,
    pub assigned_user_id: Option<Uuid>,
}
