use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::PHONE_REGEX;

/// A WhatsApp chatbot owned by exactly one tenant.
///
/// The AI configuration is opaque to this crate; the conversation engine
/// interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// WhatsApp number in E.164 form.
    pub phone_number: String,
    pub ai_config: serde_json::Value,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bot {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Input for creating a bot.
///
/// The owning tenant is not part of the input: the creating code passes it
/// explicitly from the request's resolved tenant context, so a bot can
/// never be stamped with an inferred tenant.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBot {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(regex(path = *PHONE_REGEX))]
    pub phone_number: String,
    #[serde(default = "default_ai_config")]
    pub ai_config: serde_json::Value,
}

fn default_ai_config() -> serde_json::Value {
    serde_json::json!({})
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBot {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(regex(path = *PHONE_REGEX))]
    pub phone_number: Option<String>,
    pub ai_config: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
