use subtle::ConstantTimeEq;

use crate::error::JobError;

/// Checks an `Authorization` header value against the configured trigger secret.
///
/// With no secret configured every caller is accepted.
pub fn verify_bearer(header: Option<&str>, secret: Option<&str>) -> Result<(), JobError> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(JobError::Unauthorized)?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(())
    } else {
        Err(JobError::Unauthorized)
    }
}
