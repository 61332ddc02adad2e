mod bots;
mod conversations;
mod grants;
mod knowledge_bases;
mod tenants;
mod users;

pub use bots::*;
pub use conversations::*;
pub use grants::*;
pub use knowledge_bases::*;
pub use tenants::*;
pub use users::*;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Maximum number of records to return.
    pub limit: Option<i64>,
    /// Number of records to skip.
    pub offset: Option<i64>,
    /// Include soft-deleted records in results.
    pub include_deleted: bool,
}

impl ListParams {
    /// Effective LIMIT/OFFSET values (SQLite treats -1 as "no limit").
    pub fn limit_offset(&self) -> (i64, i64) {
        (self.limit.unwrap_or(-1), self.offset.unwrap_or(0))
    }
}
