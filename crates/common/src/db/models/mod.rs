//! Persisted entity models

mod report;

pub use report::{
    Priority, Report, ReportFilter, ReportUpdate, RiskyClause, Scores, REPORT_COLLECTION,
};

use bson::DateTime;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Common fields carried by every persisted entity.
///
/// Flattened into the entity document: `created_at` is set once at
/// creation, `updated_at` is refreshed on every mutation, and
/// `is_deleted` marks soft-deleted documents that every read and
/// update path skips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub created_at: DateTime,
    pub updated_at: DateTime,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Default for Base {
    fn default() -> Self {
        let now = DateTime::now();
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }
}

/// Trait for entities managed by the generic repository.
///
/// Exposes the flattened base fields so the repository can stamp
/// timestamps and the delete flag without knowing the concrete type.
pub trait Entity: Serialize + DeserializeOwned + Unpin + Send + Sync {
    fn base(&self) -> &Base;
    fn base_mut(&mut self) -> &mut Base;
}
