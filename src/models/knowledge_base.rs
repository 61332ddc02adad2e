use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The knowledge base backing a bot's answers. One per bot.
///
/// Document storage and the ingestion pipeline live elsewhere; this crate
/// only knows the knowledge base as a tenant-owned resource reached
/// through its bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: Uuid,
    pub bot_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateKnowledgeBase {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateKnowledgeBase {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
