use crate::config::Config;
use crate::error::JobError;
use crate::job::{self, JobReport, JobRequest, Trigger};
use crate::store::RecordsStore;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MarkAbsenteesResponse {
    #[schema(example = 2)]
    pub inserted: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "No missing attendance records.", nullable = true)]
    pub message: Option<String>,
}

impl From<&JobReport> for MarkAbsenteesResponse {
    fn from(report: &JobReport) -> Self {
        Self {
            inserted: report.inserted(),
            message: report.message(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Unauthorized")]
    pub error: String,
}

/// Scheduled absentee marking for today's business date
///
/// Mounted under `API_PREFIX` (default `/api`). `GET` behaves the same.
#[utoipa::path(
    post,
    path = "/api/cron/mark-absentees",
    responses(
        (status = 200, description = "Run finished (including holiday and nothing-to-do outcomes)", body = MarkAbsenteesResponse, example = json!({
            "inserted": 2
        })),
        (status = 401, description = "Bearer token does not match CRON_SECRET", body = ErrorResponse, example = json!({
            "error": "Unauthorized"
        })),
        (status = 429, description = "Too many trigger calls from this address"),
        (status = 500, description = "Records store failure, nothing written", body = ErrorResponse)
    ),
    security(
        ("cron_secret" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_absentees(
    config: web::Data<Config>,
    store: web::Data<dyn RecordsStore>,
) -> Result<HttpResponse, JobError> {
    let request = JobRequest::at(Utc::now(), config.business_offset, Trigger::Scheduled);
    let report = job::run(store.get_ref(), request).await?;

    Ok(HttpResponse::Ok().json(MarkAbsenteesResponse::from(&report)))
}

/// Scheduled absentee marking for schedulers that can only issue GET
///
/// Mounted under `API_PREFIX` (default `/api`). Same as the `POST` form.
#[utoipa::path(
    get,
    path = "/api/cron/mark-absentees",
    responses(
        (status = 200, description = "Run finished (including holiday and nothing-to-do outcomes)", body = MarkAbsenteesResponse),
        (status = 401, description = "Bearer token does not match CRON_SECRET", body = ErrorResponse),
        (status = 429, description = "Too many trigger calls from this address"),
        (status = 500, description = "Records store failure, nothing written", body = ErrorResponse)
    ),
    security(
        ("cron_secret" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_absentees_get(
    config: web::Data<Config>,
    store: web::Data<dyn RecordsStore>,
) -> Result<HttpResponse, JobError> {
    mark_absentees(config, store).await
}
