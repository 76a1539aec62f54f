//! Generic repository pattern for document collections
//!
//! One repository instance wraps one collection, parameterized by the
//! entity type. Any entity carrying the base timestamp/soft-delete
//! fields gets create/read/update/soft-delete/hard-delete and filtered
//! paged queries without duplicating CRUD logic per entity.
//!
//! Lookups take the identifying field name as a parameter rather than a
//! fixed primary key, so entities can be addressed by a business id
//! distinct from the storage-assigned `_id`.

use bson::{doc, Bson, DateTime, Document};
use futures::TryStreamExt;
use mongodb::{options::ReturnDocument, Collection, Database};
use serde::Serialize;

use crate::db::models::{Entity, Report, REPORT_COLLECTION};
use crate::errors::Result;

/// Pagination and time-range parameters for filtered queries
#[derive(Debug, Clone)]
pub struct PageQuery<'a> {
    /// Number of documents to skip
    pub skip: u64,
    /// Maximum number of documents to return
    pub limit: i64,
    /// Field the time range and descending sort apply to
    pub date_field: &'a str,
    /// Inclusive lower bound on `date_field`
    pub start_time: Option<DateTime>,
    /// Inclusive upper bound on `date_field`
    pub end_time: Option<DateTime>,
}

impl Default for PageQuery<'_> {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: crate::DEFAULT_PAGE_SIZE,
            date_field: "created_at",
            start_time: None,
            end_time: None,
        }
    }
}

impl PageQuery<'_> {
    /// 1-based page index derived from skip and limit
    pub fn page_number(&self) -> u64 {
        if self.limit > 0 {
            self.skip / self.limit as u64 + 1
        } else {
            1
        }
    }
}

/// One page of query results
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Matched documents, newest first
    pub items: Vec<T>,
    /// Total count of ALL matching documents, not just this page
    pub total: u64,
    /// 1-based page index
    pub page: u64,
    /// Page size the query ran with
    pub page_size: i64,
}

/// Generic data access over one document collection
#[derive(Debug, Clone)]
pub struct BaseRepository<T: Send + Sync> {
    collection: Collection<T>,
}

impl<T: Entity> BaseRepository<T> {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }

    /// Insert a new entity.
    ///
    /// Server-assigned timestamps and a cleared delete flag override
    /// whatever the caller supplied. Uniqueness is the store's concern;
    /// no duplicate-key detection happens here.
    pub async fn create(&self, mut entity: T) -> Result<T> {
        let now = DateTime::now();
        let base = entity.base_mut();
        base.created_at = now;
        base.updated_at = now;
        base.is_deleted = false;

        self.collection.insert_one(&entity).await?;

        Ok(entity)
    }

    /// Look up one non-deleted document by an identifying field.
    /// Absence is `Ok(None)`, never an error.
    pub async fn get_by_id(&self, id_field: &str, id_value: &str) -> Result<Option<T>> {
        let document = self.collection.find_one(id_filter(id_field, id_value)).await?;
        Ok(document)
    }

    /// Filtered, paged query.
    ///
    /// Every non-null field of `filters` becomes an equality match, the
    /// soft-delete guard is always applied, and the optional time range
    /// bounds `date_field` inclusively on both ends. Results are sorted
    /// by `date_field` descending (newest first).
    pub async fn get_by_filters(
        &self,
        filters: &impl Serialize,
        query: PageQuery<'_>,
    ) -> Result<Page<T>> {
        let filter = filter_document(filters, query.date_field, query.start_time, query.end_time)?;

        let total = self.collection.count_documents(filter.clone()).await?;

        let mut sort = Document::new();
        sort.insert(query.date_field, -1);

        let cursor = self
            .collection
            .find(filter)
            .sort(sort)
            .skip(query.skip)
            .limit(query.limit)
            .await?;
        let items: Vec<T> = cursor.try_collect().await?;

        Ok(Page {
            items,
            total,
            page: query.page_number(),
            page_size: query.limit,
        })
    }

    /// Apply the non-null fields of `updates` to the matching non-deleted
    /// document, refreshing `updated_at`, and return the post-update
    /// entity. An all-null update set is a no-op: `Ok(None)` without a
    /// storage round-trip. `Ok(None)` also signals "not found".
    pub async fn update(
        &self,
        id_field: &str,
        id_value: &str,
        updates: &impl Serialize,
    ) -> Result<Option<T>> {
        let Some(mut valid_updates) = update_document(updates)? else {
            return Ok(None);
        };
        valid_updates.insert("updated_at", DateTime::now());

        let updated = self
            .collection
            .find_one_and_update(id_filter(id_field, id_value), doc! { "$set": valid_updates })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    /// Soft delete: flag the matching non-deleted document and refresh
    /// `updated_at`. True iff exactly one document was modified.
    pub async fn delete(&self, id_field: &str, id_value: &str) -> Result<bool> {
        let result = self
            .collection
            .update_one(
                id_filter(id_field, id_value),
                doc! { "$set": { "is_deleted": true, "updated_at": DateTime::now() } },
            )
            .await?;

        Ok(result.modified_count == 1)
    }

    /// Permanently remove the matching document regardless of its
    /// delete-flag state. Immediate and irreversible.
    pub async fn hard_delete(&self, id_field: &str, id_value: &str) -> Result<bool> {
        let mut filter = Document::new();
        filter.insert(id_field, id_value);

        let result = self.collection.delete_one(filter).await?;

        Ok(result.deleted_count == 1)
    }
}

impl BaseRepository<Report> {
    /// Repository bound to the report collection
    pub fn for_reports(db: &Database) -> Self {
        Self::new(db, REPORT_COLLECTION)
    }
}

/// Identity filter restricted to non-deleted documents
fn id_filter(id_field: &str, id_value: &str) -> Document {
    let mut filter = doc! { "is_deleted": false };
    filter.insert(id_field, id_value);
    filter
}

/// Build the query document: non-null equality filters, the soft-delete
/// guard, and the optional inclusive time range.
fn filter_document(
    filters: &impl Serialize,
    date_field: &str,
    start_time: Option<DateTime>,
    end_time: Option<DateTime>,
) -> Result<Document> {
    let raw = bson::to_document(filters)?;

    let mut query = Document::new();
    for (field, value) in raw {
        if value != Bson::Null {
            query.insert(field, value);
        }
    }
    query.insert("is_deleted", false);

    if start_time.is_some() || end_time.is_some() {
        let mut range = Document::new();
        if let Some(start) = start_time {
            range.insert("$gte", start);
        }
        if let Some(end) = end_time {
            range.insert("$lte", end);
        }
        query.insert(date_field, range);
    }

    Ok(query)
}

/// Drop null-valued fields from an update set. `None` means there is
/// nothing to apply.
fn update_document(updates: &impl Serialize) -> Result<Option<Document>> {
    let raw = bson::to_document(updates)?;

    let valid: Document = raw.into_iter().filter(|(_, v)| *v != Bson::Null).collect();

    if valid.is_empty() {
        return Ok(None);
    }
    Ok(Some(valid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{ReportFilter, ReportUpdate, Scores};

    #[test]
    fn test_filter_document_drops_null_fields() {
        let filters = ReportFilter { report_id: None };
        let query = filter_document(&filters, "created_at", None, None).unwrap();

        assert!(!query.contains_key("report_id"));
        assert!(!query.get_bool("is_deleted").unwrap());
    }

    #[test]
    fn test_filter_document_keeps_set_fields() {
        let filters = ReportFilter {
            report_id: Some("abc123".into()),
        };
        let query = filter_document(&filters, "created_at", None, None).unwrap();

        assert_eq!(query.get_str("report_id").unwrap(), "abc123");
    }

    #[test]
    fn test_filter_document_inclusive_time_range() {
        let start = DateTime::from_millis(1_000);
        let end = DateTime::from_millis(2_000);
        let query =
            filter_document(&ReportFilter::default(), "created_at", Some(start), Some(end))
                .unwrap();

        let range = query.get_document("created_at").unwrap();
        assert_eq!(range.get_datetime("$gte").unwrap(), &start);
        assert_eq!(range.get_datetime("$lte").unwrap(), &end);
    }

    #[test]
    fn test_filter_document_half_open_range() {
        let start = DateTime::from_millis(1_000);
        let query =
            filter_document(&ReportFilter::default(), "created_at", Some(start), None).unwrap();

        let range = query.get_document("created_at").unwrap();
        assert!(range.contains_key("$gte"));
        assert!(!range.contains_key("$lte"));
    }

    #[test]
    fn test_filter_document_no_range_without_bounds() {
        let query = filter_document(&ReportFilter::default(), "created_at", None, None).unwrap();
        assert!(!query.contains_key("created_at"));
    }

    #[test]
    fn test_update_document_all_null_is_noop() {
        let updates = ReportUpdate::default();
        assert!(update_document(&updates).unwrap().is_none());
    }

    #[test]
    fn test_update_document_drops_null_fields() {
        let updates = ReportUpdate {
            summary: Some("revised".into()),
            ..Default::default()
        };
        let set = update_document(&updates).unwrap().unwrap();

        assert_eq!(set.get_str("summary").unwrap(), "revised");
        assert!(!set.contains_key("scores"));
        assert!(!set.contains_key("reason"));
    }

    #[test]
    fn test_update_document_serializes_nested_values() {
        let updates = ReportUpdate {
            scores: Some(Scores {
                privacy: 10,
                fairness: 20,
                readability: 30,
            }),
            ..Default::default()
        };
        let set = update_document(&updates).unwrap().unwrap();

        let scores = set.get_document("scores").unwrap();
        assert_eq!(scores.get_i32("privacy").unwrap(), 10);
    }

    #[test]
    fn test_id_filter_guards_soft_deleted() {
        let filter = id_filter("report_id", "abc");
        assert!(!filter.get_bool("is_deleted").unwrap());
        assert_eq!(filter.get_str("report_id").unwrap(), "abc");
    }

    #[test]
    fn test_page_number_from_skip_and_limit() {
        let query = PageQuery {
            skip: 0,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.page_number(), 1);

        let query = PageQuery {
            skip: 20,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.page_number(), 3);

        let query = PageQuery {
            skip: 25,
            limit: 10,
            ..Default::default()
        };
        assert_eq!(query.page_number(), 3);
    }
}
