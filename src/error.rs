use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Which table a failed store call was reading or pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StoreResource {
    HolidayOverride,
    Roster,
    Attendance,
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to fetch {resource}: {source}")]
    StoreRead {
        resource: StoreResource,
        #[source]
        source: StoreError,
    },

    #[error("Failed to insert attendance: {0}")]
    StoreWrite(#[source] StoreError),

    #[error("Failed to delete {resource}: {source}")]
    StoreDelete {
        resource: StoreResource,
        #[source]
        source: StoreError,
    },
}

impl JobError {
    pub fn read(resource: StoreResource) -> impl FnOnce(StoreError) -> JobError {
        move |source| JobError::StoreRead { resource, source }
    }

    pub fn delete(resource: StoreResource) -> impl FnOnce(StoreError) -> JobError {
        move |source| JobError::StoreDelete { resource, source }
    }
}

impl ResponseError for JobError {
    fn status_code(&self) -> StatusCode {
        match self {
            JobError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_401_with_bare_message() {
        let err = JobError::Unauthorized;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn read_failures_name_the_resource() {
        let err = JobError::read(StoreResource::Roster)(StoreError::Unavailable("down".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to fetch roster"));
    }

    #[test]
    fn delete_failures_name_the_resource() {
        let err = JobError::delete(StoreResource::HolidayOverride)(StoreError::Unavailable("down".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to delete holiday_override"));
        assert!(!err.to_string().contains("attendance"));
    }
}
