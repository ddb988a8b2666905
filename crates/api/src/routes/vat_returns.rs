//! VAT return routes.
//!
//! A thin layer over the VAT return service: path and body parsing, status
//! codes, and the raw-bytes export response.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{extract_json, extract_path, extract_query},
};
use dds_core::export::{ExportKind, ExportWarning};
use dds_core::lifecycle::VatReturnStatus;
use dds_core::returns::{DeclarationUpdate, VatReturn, VatReturnError, VatReturnStore};
use dds_core::vat::LedgerSource;
use dds_shared::AppError;
use dds_shared::types::{CompanyId, VatReturnId};

/// Header carrying the number of export warnings.
pub const EXPORT_WARNINGS_HEADER: &str = "x-export-warnings";
/// Header repeated once per export warning.
pub const EXPORT_WARNING_HEADER: &str = "x-export-warning";
/// Export path segment for the zip of all three files.
pub const BUNDLE_SEGMENT: &str = "zip";

/// Creates the VAT return routes.
pub fn routes<S, L>() -> Router<AppState<S, L>>
where
    S: VatReturnStore + 'static,
    L: LedgerSource + 'static,
{
    Router::new()
        .route(
            "/vat-returns",
            get(list_returns::<S, L>).post(open_draft::<S, L>),
        )
        .route("/vat-returns/generate", post(generate::<S, L>))
        .route(
            "/vat-returns/{id}",
            get(get_return::<S, L>)
                .put(update_return::<S, L>)
                .delete(delete_return::<S, L>),
        )
        .route("/vat-returns/{id}/submit", post(submit::<S, L>))
        .route("/vat-returns/{id}/status", post(record_status::<S, L>))
        .route("/vat-returns/{id}/export/{kind}", get(export::<S, L>))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query for listing a company's returns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Company whose returns are listed.
    pub company_id: Option<Uuid>,
}

/// Body naming one company and month.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRequest {
    /// Declaring company.
    pub company_id: Uuid,
    /// Period year.
    pub period_year: i32,
    /// Period month, 1-12.
    pub period_month: u32,
}

/// Body for recording an external status.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// `ACCEPTED` or `PAID`.
    pub status: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// A VAT return with the bounds of its period spelled out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VatReturnResponse {
    /// The stored return.
    #[serde(flatten)]
    pub vat_return: VatReturn,
    /// First day of the period.
    pub period_from: NaiveDate,
    /// Last day of the period.
    pub period_to: NaiveDate,
}

impl TryFrom<VatReturn> for VatReturnResponse {
    type Error = ApiError;

    fn try_from(vat_return: VatReturn) -> Result<Self, Self::Error> {
        let period = vat_return.period().map_err(VatReturnError::from)?;
        Ok(Self {
            period_from: period.first_day(),
            period_to: period.last_day(),
            vat_return,
        })
    }
}

fn respond(vat_return: VatReturn) -> Result<Json<VatReturnResponse>, ApiError> {
    Ok(Json(VatReturnResponse::try_from(vat_return)?))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/vat-returns?companyId=`
async fn list_returns<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<VatReturnResponse>>, ApiError> {
    let company_id = extract_query(query)?
        .company_id
        .ok_or_else(|| ApiError::validation("companyId is required"))?;
    let returns = state
        .service
        .list_by_company(CompanyId::from_uuid(company_id))
        .await?
        .into_iter()
        .map(VatReturnResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(returns))
}

/// POST `/vat-returns`
async fn open_draft<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    body: Result<Json<PeriodRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VatReturnResponse>), ApiError> {
    let payload = extract_json(body)?;
    let vat_return = state
        .service
        .open_draft(
            CompanyId::from_uuid(payload.company_id),
            payload.period_year,
            payload.period_month,
        )
        .await?;
    Ok((StatusCode::CREATED, respond(vat_return)?))
}

/// POST `/vat-returns/generate`
async fn generate<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    body: Result<Json<PeriodRequest>, JsonRejection>,
) -> Result<Json<VatReturnResponse>, ApiError> {
    let payload = extract_json(body)?;
    let vat_return = state
        .service
        .generate(
            CompanyId::from_uuid(payload.company_id),
            payload.period_year,
            payload.period_month,
        )
        .await?;
    respond(vat_return)
}

/// GET `/vat-returns/{id}`
async fn get_return<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<VatReturnResponse>, ApiError> {
    let id = VatReturnId::from_uuid(extract_path(path)?);
    respond(state.service.get(id).await?)
}

/// PUT `/vat-returns/{id}`
async fn update_return<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<DeclarationUpdate>, JsonRejection>,
) -> Result<Json<VatReturnResponse>, ApiError> {
    let id = VatReturnId::from_uuid(extract_path(path)?);
    let payload = extract_json(body)?;
    if payload.is_empty() {
        return Err(ApiError::validation(
            "Request names neither creditCoefficient nor settlement",
        ));
    }
    respond(state.service.update(id, payload).await?)
}

/// DELETE `/vat-returns/{id}`
async fn delete_return<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let id = VatReturnId::from_uuid(extract_path(path)?);
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/vat-returns/{id}/submit`
async fn submit<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<VatReturnResponse>, ApiError> {
    let id = VatReturnId::from_uuid(extract_path(path)?);
    respond(state.service.submit(id).await?)
}

/// POST `/vat-returns/{id}/status`
async fn record_status<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<VatReturnResponse>, ApiError> {
    let id = VatReturnId::from_uuid(extract_path(path)?);
    let payload = extract_json(body)?;
    let target = VatReturnStatus::parse(&payload.status).ok_or_else(|| {
        ApiError::validation(format!("Unknown status '{}'", payload.status))
    })?;
    respond(state.service.record_status(id, target).await?)
}

/// GET `/vat-returns/{id}/export/{kind}`
///
/// `kind` is one of the three files, or `zip` for all of them.
async fn export<S: VatReturnStore, L: LedgerSource>(
    State(state): State<AppState<S, L>>,
    path: Result<Path<(Uuid, String)>, PathRejection>,
) -> Result<Response, ApiError> {
    let (id, kind) = extract_path(path)?;
    let id = VatReturnId::from_uuid(id);

    if kind.eq_ignore_ascii_case(BUNDLE_SEGMENT) {
        let bundle = state.service.export_bundle(id).await?;
        info!(
            vat_return_id = %id,
            file = %bundle.file_name,
            bytes = bundle.bytes.len(),
            "VAT return bundle exported"
        );
        let warnings: Vec<String> = bundle
            .warnings
            .iter()
            .map(|(file, warning)| format!("{file}: {warning}"))
            .collect();
        let headers = export_headers("application/zip", &bundle.file_name, &warnings)?;
        return Ok((headers, bundle.bytes).into_response());
    }

    let kind = ExportKind::parse(&kind)
        .ok_or_else(|| ApiError::validation(format!("Unknown export kind '{kind}'")))?;
    let artifact = state.service.export(id, kind).await?;

    info!(
        vat_return_id = %id,
        file = artifact.file_name,
        bytes = artifact.bytes.len(),
        "VAT return exported"
    );
    let warnings: Vec<String> = artifact.warnings.iter().map(ExportWarning::to_string).collect();
    let headers = export_headers("application/octet-stream", artifact.file_name, &warnings)?;
    Ok((headers, artifact.bytes).into_response())
}

/// Content type, attachment name, and one header per warning.
fn export_headers(
    content_type: &'static str,
    file_name: &str,
    warnings: &[String],
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        CONTENT_DISPOSITION,
        header_value(format!("attachment; filename=\"{file_name}\""))?,
    );
    headers.insert(EXPORT_WARNINGS_HEADER, HeaderValue::from(warnings.len()));
    for warning in warnings {
        headers.append(EXPORT_WARNING_HEADER, header_value(warning.clone())?);
    }
    Ok(headers)
}

fn header_value(value: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(value)
        .map_err(|e| ApiError::App(AppError::Internal(format!("invalid header value: {e}"))))
}
