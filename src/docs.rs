use crate::api::mark_absentees::{ErrorResponse, MarkAbsenteesResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance Job API",
        version = "1.0.0",
        description = r#"
## Absentee auto-marking

Marks every active employee without an attendance record for today's business
date as **absent**, unless the date is a holiday.

### Calendar rules
- An explicit holiday override for the date always wins.
- Otherwise Sunday is a holiday and every other day is a working day.

### Mounting
The trigger accepts both `GET` and `POST` and is mounted under `API_PREFIX`
(default `/api`). The document served by the binary uses the configured prefix.

### Security
When `CRON_SECRET` is configured the trigger requires `Authorization: Bearer <CRON_SECRET>`.

### Idempotency
Employees that already have a record for the date are never inserted again, so
the trigger can safely be re-run.
"#,
    ),
    paths(
        crate::api::mark_absentees::mark_absentees,
        crate::api::mark_absentees::mark_absentees_get
    ),
    components(schemas(MarkAbsenteesResponse, ErrorResponse)),
    modifiers(&CronSecurity),
    tags(
        (name = "Attendance", description = "Attendance automation APIs"),
    )
)]
pub struct ApiDoc;

/// Prefix the paths above are written with.
const DOCUMENTED_PREFIX: &str = "/api";

/// The OpenAPI document with paths rewritten to the mounted `API_PREFIX`.
pub fn openapi_for(api_prefix: &str) -> openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if api_prefix == DOCUMENTED_PREFIX {
        return doc;
    }
    let prefix = api_prefix.trim_end_matches('/');
    doc.paths.paths = std::mem::take(&mut doc.paths.paths)
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DOCUMENTED_PREFIX) {
            Some(rest) => (format!("{}{}", prefix, rest), item),
            None => (path, item),
        })
        .collect();
    doc
}

struct CronSecurity;

impl Modify for CronSecurity {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cron_secret",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::PathItemType;

    #[test]
    fn trigger_is_documented_for_get_and_post() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/cron/mark-absentees").unwrap();
        assert!(item.operations.contains_key(&PathItemType::Get));
        assert!(item.operations.contains_key(&PathItemType::Post));
    }

    #[test]
    fn configured_prefix_replaces_the_documented_one() {
        let doc = openapi_for("/internal/");
        assert!(doc.paths.paths.contains_key("/internal/cron/mark-absentees"));
        assert!(!doc.paths.paths.contains_key("/api/cron/mark-absentees"));

        let doc = openapi_for("/api");
        assert!(doc.paths.paths.contains_key("/api/cron/mark-absentees"));
    }
}
