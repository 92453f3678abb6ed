use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use uuid::Uuid;

use super::{RecordsStore, StoreError};
use crate::config::StoreConfig;
use crate::model::{AttendanceRecord, AttendanceRef, Employee, HolidayOverride, NewAttendance};

const PROFILES: &str = "profiles";
const ATTENDANCE: &str = "attendance";
const HOLIDAYS: &str = "holidays";

const EMPLOYEE_COLUMNS: &str = "id,email,full_name,role,is_active";
const HOLIDAY_COLUMNS: &str = "id,date,is_holiday,name,description";

/// Client for the store's auto-generated REST interface (`/rest/v1/<table>`),
/// authenticated with the service-role key.
#[derive(Clone)]
pub struct RestStore {
    http: Client,
    base_url: String,
    service_key: String,
    page_size: usize,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            page_size: config.page_size.max(1),
        })
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header(AUTHORIZATION, format!("Bearer {}", self.service_key))
            .header("apikey", &self.service_key)
            .header(ACCEPT, "application/json")
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T, StoreError> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, context, "Store request failed before a response");
            StoreError::Request(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            debug!(context, status = status.as_u16(), "Store request succeeded");
            return Ok(serde_json::from_str(&body)?);
        }

        error!(context, status = status.as_u16(), body = %body, "Store returned an error");
        if status == StatusCode::CONFLICT {
            Err(StoreError::Conflict(body))
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Reads every matching row, one `limit`/`offset` page at a time.
    ///
    /// Only an empty page ends the scan. The server may cap rows per response
    /// below `page_size`, so a short page is not proof of the last one.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        order: &str,
        context: &str,
    ) -> Result<Vec<T>, StoreError> {
        let mut rows = Vec::new();
        let mut offset = 0usize;

        loop {
            let paging = [
                ("order", order.to_string()),
                ("limit", self.page_size.to_string()),
                ("offset", offset.to_string()),
            ];
            let request = self.request(Method::GET, table).query(filters).query(&paging);
            let page: Vec<T> = self.send(request, context).await?;

            if page.is_empty() {
                break;
            }
            offset += page.len();
            rows.extend(page);
        }

        Ok(rows)
    }
}

#[async_trait]
impl RecordsStore for RestStore {
    async fn list_active_employees(&self) -> Result<Vec<Employee>, StoreError> {
        let filters = [
            ("select", EMPLOYEE_COLUMNS.to_string()),
            ("role", "eq.employee".to_string()),
            ("is_active", "eq.true".to_string()),
        ];
        self.fetch_all(PROFILES, &filters, "id.asc", "list active employees")
            .await
    }

    async fn list_attendance_for_date(&self, date: NaiveDate) -> Result<Vec<Uuid>, StoreError> {
        let filters = [
            ("select", "employee_id".to_string()),
            ("date", format!("eq.{}", date)),
        ];
        let rows: Vec<AttendanceRef> = self
            .fetch_all(ATTENDANCE, &filters, "employee_id.asc", "list attendance")
            .await?;
        Ok(rows.into_iter().map(|r| r.employee_id).collect())
    }

    async fn get_holiday_override(
        &self,
        date: NaiveDate,
    ) -> Result<Option<HolidayOverride>, StoreError> {
        let request = self.request(Method::GET, HOLIDAYS).query(&[
            ("select", HOLIDAY_COLUMNS.to_string()),
            ("date", format!("eq.{}", date)),
            ("limit", "1".to_string()),
        ]);
        let rows: Vec<HolidayOverride> = self.send(request, "get holiday override").await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_attendance_batch(
        &self,
        rows: &[NewAttendance],
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let request = self
            .request(Method::POST, ATTENDANCE)
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "return=representation")
            .json(rows);
        self.send(request, "insert attendance batch").await
    }

    async fn list_holiday_overrides(&self) -> Result<Vec<HolidayOverride>, StoreError> {
        let filters = [("select", HOLIDAY_COLUMNS.to_string())];
        self.fetch_all(HOLIDAYS, &filters, "date.asc", "list holiday overrides")
            .await
    }

    async fn delete_holiday_overrides(&self, ids: &[Uuid]) -> Result<usize, StoreError> {
        let id_list = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let request = self
            .request(Method::DELETE, HOLIDAYS)
            .header("Prefer", "return=representation")
            .query(&[
                ("id", format!("in.({})", id_list)),
                ("select", "id".to_string()),
            ]);
        let deleted: Vec<serde_json::Value> = self.send(request, "delete holiday overrides").await?;
        Ok(deleted.len())
    }
}
