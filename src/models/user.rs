use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Global role held by a user. Exactly one per user.
///
/// `SuperAdmin` is platform-level and carries no tenant affiliation; all
/// other roles are scoped to the user's tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Supervisor,
    Agent,
    Viewer,
}

impl UserRole {
    /// Convert to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Agent => "agent",
            Self::Viewer => "viewer",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "admin" => Some(Self::Admin),
            "supervisor" => Some(Self::Supervisor),
            "agent" => Some(Self::Agent),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    pub fn is_supervisor(&self) -> bool {
        matches!(self, Self::Supervisor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated actor.
///
/// The login/session subsystem authenticates users; this crate trusts the
/// `User` it is handed and only decides what that user may do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// None only for super admins. A non-super-admin without a tenant is a
    /// misconfigured account and is rejected by the tenant gate.
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether this user belongs to the given tenant.
    ///
    /// Always false for super admins, which hold no tenant; callers that
    /// want the super-admin override check the role first.
    pub fn belongs_to(&self, tenant_id: Uuid) -> bool {
        self.tenant_id == Some(tenant_id)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    /// Tenant the user belongs to. Must be None for super admins and
    /// present for every other role.
    pub tenant_id: Option<Uuid>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub role: UserRole,
}

impl CreateUser {
    /// Check the role/tenant pairing invariant.
    pub fn role_tenant_consistent(&self) -> bool {
        match self.role {
            UserRole::SuperAdmin => self.tenant_id.is_none(),
            _ => self.tenant_id.is_some(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Supervisor,
            UserRole::Agent,
            UserRole::Viewer,
        ] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[test]
    fn test_super_admin_belongs_to_no_tenant() {
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: None,
            email: "root@bothub.io".to_string(),
            name: "Root".to_string(),
            role: UserRole::SuperAdmin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!user.belongs_to(Uuid::new_v4()));
    }

    #[test]
    fn test_create_user_role_tenant_consistency() {
        let input = CreateUser {
            tenant_id: None,
            email: "root@bothub.io".to_string(),
            name: "Root".to_string(),
            role: UserRole::SuperAdmin,
        };
        assert!(input.role_tenant_consistent());

        let input = CreateUser {
            tenant_id: None,
            email: "agent@acme.io".to_string(),
            name: "Agent".to_string(),
            role: UserRole::Agent,
        };
        assert!(!input.role_tenant_consistent());
    }
}
