mod bots;
mod common;
mod conversations;
mod grants;
mod knowledge_bases;
mod tenants;
mod users;

pub use bots::SqliteBotRepo;
pub use conversations::SqliteConversationRepo;
pub use grants::SqliteBotGrantRepo;
pub use knowledge_bases::SqliteKnowledgeBaseRepo;
pub use tenants::SqliteTenantRepo;
pub use users::SqliteUserRepo;
