use uuid::Uuid;

use crate::{
    db::error::{DbError, DbResult},
    tenancy::TenantScope,
};

/// Parse a UUID string from the database, returning a DbError on failure
pub fn parse_uuid(s: &str) -> DbResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DbError::Internal(format!("Invalid UUID in database: {}", e)))
}

/// Render a tenant scope as a SQL predicate on `column`.
///
/// Returns the `AND ...` fragment to splice into the WHERE clause and the
/// value to bind, if any. `Empty` scopes render a predicate that matches
/// no rows.
pub fn scope_predicate(scope: &TenantScope, column: &str) -> (String, Option<String>) {
    match scope {
        TenantScope::Tenant(id) => (format!("AND {} = ?", column), Some(id.to_string())),
        TenantScope::Unscoped => (String::new(), None),
        TenantScope::Empty => ("AND 1 = 0".to_string(), None),
    }
}
