use crate::auth::cron_secret::verify_bearer;
use crate::config::Config;
use crate::job::runner::{JobStage, enter};
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use tracing::warn;

/// Rejects trigger calls whose bearer token does not match `CRON_SECRET`
/// before the handler (and therefore the records store) is reached.
pub async fn cron_auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    enter(JobStage::Authenticating);

    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    if verify_bearer(header, config.cron_secret.as_deref()).is_err() {
        warn!(peer = ?req.peer_addr(), "Unauthorized cron invocation");
        let resp = HttpResponse::Unauthorized().json(json!({"error": "Unauthorized"}));
        return Ok(req.into_response(resp.map_into_boxed_body()));
    }

    next.call(req).await
}
