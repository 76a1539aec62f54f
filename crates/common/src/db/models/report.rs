//! Report document schema
//!
//! A report is the stored risk assessment of one terms-and-conditions
//! document. Scores and risky clauses are owned value objects embedded
//! in the report document; they have no independent lifecycle.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Base, Entity};

/// Collection name for reports
pub const REPORT_COLLECTION: &str = "report";

/// Severity of a flagged clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Bounded ratings, each in 1..=100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Scores {
    #[validate(range(min = 1, max = 100))]
    pub privacy: i32,

    #[validate(range(min = 1, max = 100))]
    pub fairness: i32,

    #[validate(range(min = 1, max = 100))]
    pub readability: i32,
}

/// A clause flagged as risky, with its severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskyClause {
    pub title: String,
    pub priority: Priority,
}

/// Report document stored in MongoDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Business identifier, distinct from the storage-assigned `_id`
    pub report_id: String,

    pub scores: Scores,

    pub summary: String,

    pub risky_clauses: Vec<RiskyClause>,

    #[serde(default)]
    pub detected_phrases: Vec<String>,

    #[serde(default)]
    pub reason: String,

    /// Common timestamps and soft-delete flag
    #[serde(flatten)]
    pub base: Base,
}

impl Report {
    /// Create a new report with a generated identifier
    pub fn new(
        scores: Scores,
        summary: String,
        risky_clauses: Vec<RiskyClause>,
        detected_phrases: Vec<String>,
        reason: String,
    ) -> Self {
        Self {
            report_id: ObjectId::new().to_hex(),
            scores,
            summary,
            risky_clauses,
            detected_phrases,
            reason,
            base: Base::default(),
        }
    }
}

impl Entity for Report {
    fn base(&self) -> &Base {
        &self.base
    }

    fn base_mut(&mut self) -> &mut Base {
        &mut self.base
    }
}

/// Equality filters for report queries. Only non-null fields take part
/// in the query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFilter {
    pub report_id: Option<String>,
}

/// Partial update for a report. Null fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReportUpdate {
    #[validate(nested)]
    pub scores: Option<Scores>,

    pub summary: Option<String>,

    pub risky_clauses: Option<Vec<RiskyClause>>,

    pub detected_phrases: Option<Vec<String>>,

    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> Scores {
        Scores {
            privacy: 50,
            fairness: 60,
            readability: 70,
        }
    }

    #[test]
    fn test_new_report_generates_identifier() {
        let report = Report::new(scores(), "test".into(), vec![], vec![], String::new());
        assert_eq!(report.report_id.len(), 24);
        assert!(!report.base.is_deleted);
    }

    #[test]
    fn test_priority_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(Priority::High).unwrap(),
            serde_json::json!("HIGH")
        );
        let parsed: Priority = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, Priority::Medium);
    }

    #[test]
    fn test_scores_bounds() {
        assert!(scores().validate().is_ok());

        let zero = Scores {
            privacy: 0,
            fairness: 60,
            readability: 70,
        };
        assert!(zero.validate().is_err());

        let too_high = Scores {
            privacy: 50,
            fairness: 101,
            readability: 70,
        };
        assert!(too_high.validate().is_err());

        let upper_edge = Scores {
            privacy: 100,
            fairness: 100,
            readability: 100,
        };
        assert!(upper_edge.validate().is_ok());
    }

    #[test]
    fn test_report_document_round_trip() {
        let report = Report::new(
            scores(),
            "test".into(),
            vec![RiskyClause {
                title: "Clause A".into(),
                priority: Priority::High,
            }],
            vec!["binding arbitration".into()],
            "broad data sharing".into(),
        );

        let doc = bson::to_document(&report).unwrap();
        // Base fields are flattened into the document root
        assert!(doc.contains_key("created_at"));
        assert!(doc.contains_key("is_deleted"));

        let parsed: Report = bson::from_document(doc).unwrap();
        assert_eq!(parsed.report_id, report.report_id);
        assert_eq!(parsed.scores, report.scores);
        assert_eq!(parsed.summary, report.summary);
        assert_eq!(parsed.risky_clauses, report.risky_clauses);
    }
}
