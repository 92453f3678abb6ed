use crate::{
    api::mark_absentees, auth::middleware::cron_auth_middleware, config::Config, error::JobError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiter allowing `requests_per_min` with an equal burst.
pub fn build_limiter(requests_per_min: u32) -> Result<Limiter, JobError> {
    if requests_per_min == 0 {
        return Err(JobError::Configuration(
            "RATE_TRIGGER_PER_MIN must be greater than zero".to_string(),
        ));
    }
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| JobError::Configuration("invalid rate limit settings".to_string()))?;
    Ok(Arc::new(Governor::new(&cfg)))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Limiter) {
    cfg.service(
        web::scope(&config.api_prefix).service(
            web::scope("/cron")
                .wrap(from_fn(cron_auth_middleware)) // shared secret
                .wrap(limiter) // rate limiting
                // /cron/mark-absentees
                .service(
                    web::resource("/mark-absentees")
                        .route(web::get().to(mark_absentees::mark_absentees_get))
                        .route(web::post().to(mark_absentees::mark_absentees)),
                ),
        ),
    );
}
