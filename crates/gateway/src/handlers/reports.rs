//! Report management handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use validator::Validate;

use crate::AppState;
use tncguard_common::{
    db::models::{Report, ReportFilter, ReportUpdate, RiskyClause, Scores},
    db::{BaseRepository, PageQuery},
    errors::Result,
    metrics, DEFAULT_PAGE_SIZE,
    responses::{ResponseCode, TncResponse},
};

/// Request to store a new report
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReportRequest {
    #[validate(nested)]
    pub scores: Scores,

    #[validate(length(min = 1))]
    pub summary: String,

    #[serde(default)]
    pub risky_clauses: Vec<RiskyClause>,

    #[serde(default)]
    pub detected_phrases: Vec<String>,

    #[serde(default)]
    pub reason: String,
}

/// Query parameters for the report listing
#[derive(Debug, Default, Deserialize)]
pub struct ListReportsQuery {
    pub report_id: Option<String>,

    #[serde(default)]
    pub skip: u64,

    pub limit: Option<i64>,

    /// Inclusive lower bound on `created_at` (RFC 3339)
    pub start_time: Option<chrono::DateTime<chrono::Utc>>,

    /// Inclusive upper bound on `created_at` (RFC 3339)
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
}

/// Report as rendered inside the response envelope
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_id: String,
    pub scores: Scores,
    pub summary: String,
    pub risky_clauses: Vec<RiskyClause>,
    pub detected_phrases: Vec<String>,
    pub reason: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            report_id: report.report_id,
            scores: report.scores,
            summary: report.summary,
            risky_clauses: report.risky_clauses,
            detected_phrases: report.detected_phrases,
            reason: report.reason,
            created_at: report.base.created_at.to_chrono().to_rfc3339(),
            updated_at: report.base.updated_at.to_chrono().to_rfc3339(),
        }
    }
}

/// Store a new report
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<CreateReportRequest>,
) -> Result<TncResponse> {
    request.validate()?;

    let repo = BaseRepository::for_reports(state.db.database());
    let report = Report::new(
        request.scores,
        request.summary,
        request.risky_clauses,
        request.detected_phrases,
        request.reason,
    );

    let start = Instant::now();
    let created = repo.create(report).await?;
    metrics::record_report_operation("create", start.elapsed().as_secs_f64());

    tracing::info!(report_id = %created.report_id, "Report created");

    let data = serde_json::to_value(ReportResponse::from(created))?;
    Ok(TncResponse::create_response("report", Some(data), None))
}

/// Get a report by its business id
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<TncResponse> {
    let repo = BaseRepository::for_reports(state.db.database());

    let start = Instant::now();
    let report = repo.get_by_id("report_id", &report_id).await?;
    metrics::record_report_operation("get", start.elapsed().as_secs_f64());

    match report {
        Some(report) => {
            let data = serde_json::to_value(ReportResponse::from(report))?;
            Ok(TncResponse::get_response("report", Some(data), None))
        }
        None => Ok(TncResponse::not_found_response("report", None)),
    }
}

/// List reports with equality filters, pagination, and an optional
/// inclusive time range on `created_at`
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ListReportsQuery>,
) -> Result<TncResponse> {
    let repo = BaseRepository::for_reports(state.db.database());

    let filters = ReportFilter {
        report_id: query.report_id,
    };
    let page_query = PageQuery {
        skip: query.skip,
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        date_field: "created_at",
        start_time: query.start_time.map(bson::DateTime::from_chrono),
        end_time: query.end_time.map(bson::DateTime::from_chrono),
    };

    let start = Instant::now();
    let page = repo.get_by_filters(&filters, page_query).await?;
    metrics::record_report_operation("list", start.elapsed().as_secs_f64());

    let items = page
        .items
        .into_iter()
        .map(|report| serde_json::to_value(ReportResponse::from(report)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(TncResponse::paged_response(
        "report",
        items,
        page.total,
        page.page,
        page.page_size,
        None,
        None,
    ))
}

/// Apply a partial update to a report; null fields are left untouched
pub async fn update_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(updates): Json<ReportUpdate>,
) -> Result<TncResponse> {
    updates.validate()?;

    if updates.scores.is_none()
        && updates.summary.is_none()
        && updates.risky_clauses.is_none()
        && updates.detected_phrases.is_none()
        && updates.reason.is_none()
    {
        return Ok(TncResponse::error_response(
            Some("Nothing to update."),
            ResponseCode::BadRequest,
        ));
    }

    let repo = BaseRepository::for_reports(state.db.database());

    let start = Instant::now();
    let updated = repo.update("report_id", &report_id, &updates).await?;
    metrics::record_report_operation("update", start.elapsed().as_secs_f64());

    match updated {
        Some(report) => {
            tracing::info!(report_id = %report.report_id, "Report updated");
            let data = serde_json::to_value(ReportResponse::from(report))?;
            Ok(TncResponse::update_response("report", Some(data), None))
        }
        None => Ok(TncResponse::not_found_response("report", None)),
    }
}

/// Soft-delete a report; the document is retained but leaves every
/// read and update path
pub async fn delete_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<TncResponse> {
    let repo = BaseRepository::for_reports(state.db.database());

    let start = Instant::now();
    let deleted = repo.delete("report_id", &report_id).await?;
    metrics::record_report_operation("delete", start.elapsed().as_secs_f64());

    if deleted {
        tracing::info!(report_id = %report_id, "Report deleted");
    }

    Ok(TncResponse::delete_response("report", deleted, None, None))
}

/// Permanently remove a report, deleted or not
pub async fn purge_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<TncResponse> {
    let repo = BaseRepository::for_reports(state.db.database());

    let start = Instant::now();
    let removed = repo.hard_delete("report_id", &report_id).await?;
    metrics::record_report_operation("purge", start.elapsed().as_secs_f64());

    if removed {
        tracing::info!(report_id = %report_id, "Report permanently removed");
    }

    Ok(TncResponse::delete_response(
        "report",
        removed,
        Some("report permanently deleted."),
        None,
    ))
}
