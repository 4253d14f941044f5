use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use esg_insight::dataset::LoadError;
use esg_insight::error::AppError;
use esg_insight::{CompanyReport, EsgReportService};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    pub(crate) q: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchResponse {
    pub(crate) query: String,
    pub(crate) matches: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    pub(crate) selection: String,
}

pub(crate) fn router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/companies", get(search_endpoint))
        .route("/api/v1/companies/report", get(report_endpoint))
        .route("/api/v1/companies/report.pdf", get(pdf_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({
            "status": "ready",
            "companies": state.reports.dataset().table.len(),
            "source": state.reports.source().label(),
        })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn search_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    let matches = state.reports.search(&query.q);
    Json(SearchResponse {
        query: query.q,
        matches,
    })
}

/// Runs CPU-bound report work off the async workers.
async fn blocking<T, F>(state: &AppState, work: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&EsgReportService) -> Result<T, LoadError> + Send + 'static,
{
    let reports = Arc::clone(&state.reports);
    let outcome = tokio::task::spawn_blocking(move || work(&reports))
        .await
        .map_err(std::io::Error::from)?;
    Ok(outcome?)
}

pub(crate) async fn report_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<CompanyReport>, AppError> {
    let report = blocking(&state, move |reports| {
        reports.company_report(&query.selection)
    })
    .await?;
    Ok(Json(report))
}

pub(crate) async fn pdf_endpoint(
    Extension(state): Extension<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, AppError> {
    let export = blocking(&state, move |reports| reports.export_pdf(&query.selection)).await?;
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.document.bytes,
    )
        .into_response())
}
