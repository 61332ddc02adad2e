use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::SLUG_REGEX;

/// Subscription plan tier for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionPlan {
    #[default]
    Starter,
    Professional,
    Enterprise,
}

impl SubscriptionPlan {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "starter" => Some(Self::Starter),
            "professional" => Some(Self::Professional),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Subscription lifecycle state for a tenant.
///
/// Tenants are never hard-deleted; `Cancelled` is the terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Trial,
    Active,
    Suspended,
    Cancelled,
}

impl SubscriptionStatus {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(Self::Trial),
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Usage limits attached to a tenant's plan.
///
/// Carried for the billing layer; this crate stores and returns them but
/// does not enforce them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TenantLimits {
    pub max_bots: i64,
    pub max_conversations_per_month: i64,
    pub max_users: i64,
}

impl Default for TenantLimits {
    fn default() -> Self {
        Self {
            max_bots: 1,
            max_conversations_per_month: 1000,
            max_users: 5,
        }
    }
}

/// A billing customer organization: the unit of data isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    /// When the current subscription lapses. None means no fixed end.
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub limits: TenantLimits,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Whether users of this tenant may operate at `now`.
    ///
    /// Suspended and cancelled tenants are shut out, as is any tenant whose
    /// subscription end date has passed.
    pub fn is_operational(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Suspended | SubscriptionStatus::Cancelled => false,
            SubscriptionStatus::Trial | SubscriptionStatus::Active => self
                .subscription_ends_at
                .is_none_or(|ends_at| ends_at > now),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTenant {
    /// URL-friendly identifier (lowercase alphanumeric with hyphens)
    #[validate(length(min = 1, max = 64), regex(path = *SLUG_REGEX))]
    pub slug: String,
    /// Display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub plan: SubscriptionPlan,
    pub subscription_ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTenant {
    /// New display name
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub plan: Option<SubscriptionPlan>,
    pub status: Option<SubscriptionStatus>,
    pub subscription_ends_at: Option<DateTime<Utc>>,
    pub limits: Option<TenantLimits>,
}
