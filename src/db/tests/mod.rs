//! Shared database repository test infrastructure.
//!
//! All repository tests run against fast in-memory SQLite databases with
//! the real migrations applied, so every test sees the production schema.
//! [`TestDb`] seeds the cross-entity records most tests need.


use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::{
        DbPool,
        repos::{BotGrantRepo, BotRepo, ConversationRepo, KnowledgeBaseRepo, TenantRepo, UserRepo},
    },
    models::{
        Bot, CreateBot, CreateConversation, CreateKnowledgeBase, CreateTenant, CreateUser, Tenant,
        User, UserRole,
    },
};

/// Pool plus cached repos for one test database.
pub struct TestDb {
    pub pool: SqlitePool,
    pub db: DbPool,
}

impl TestDb {
    pub async fn new() -> Self {
        let pool = harness::migrated_memory_pool().await;
        let db = DbPool::from_sqlite(pool.clone());
        Self { pool, db }
    }

    pub fn tenants(&self) -> std::sync::Arc<dyn TenantRepo> {
        self.db.tenants()
    }

    pub fn users(&self) -> std::sync::Arc<dyn UserRepo> {
        self.db.users()
    }

    pub fn bots(&self) -> std::sync::Arc<dyn BotRepo> {
        self.db.bots()
    }

    pub fn bot_grants(&self) -> std::sync::Arc<dyn BotGrantRepo> {
        self.db.bot_grants()
    }

    pub fn conversations(&self) -> std::sync::Arc<dyn ConversationRepo> {
        self.db.conversations()
    }

    pub fn knowledge_bases(&self) -> std::sync::Arc<dyn KnowledgeBaseRepo> {
        self.db.knowledge_bases()
    }

    /// Create a tenant with the given slug.
    pub async fn create_tenant(&self, slug: &str) -> Tenant {
        self.tenants()
            .create(CreateTenant {
                slug: slug.to_string(),
                name: format!("Tenant {}", slug),
                plan: Default::default(),
                subscription_ends_at: None,
            })
            .await
            .expect("Failed to create test tenant")
    }

    /// Create a user with the given role under a tenant.
    pub async fn create_user(&self, role: UserRole, tenant_id: Option<Uuid>, email: &str) -> User {
        self.users()
            .create(CreateUser {
                tenant_id,
                email: email.to_string(),
                name: format!("User {}", email),
                role,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Create a bot owned by a tenant.
    pub async fn create_bot(&self, tenant_id: Uuid, name: &str) -> Bot {
        self.bots()
            .create(
                tenant_id,
                CreateBot {
                    name: name.to_string(),
                    phone_number: "+5511999887766".to_string(),
                    ai_config: serde_json::json!({}),
                },
            )
            .await
            .expect("Failed to create test bot")
    }
}

pub fn conversation_input() -> CreateConversation {
    CreateConversation {
        contact_phone: "+5511988776655".to_string(),
        status: Default::default(),
    }
}

pub fn kb_input(name: &str) -> CreateKnowledgeBase {
    CreateKnowledgeBase {
        name: name.to_string(),
    }
}
