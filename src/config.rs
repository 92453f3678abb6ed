use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::FixedOffset;
use dotenvy::dotenv;

use crate::error::JobError;

/// India Standard Time, UTC+05:30.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Connection settings for the records store. The service key is a privileged
/// credential and is redacted from `Debug` output.
#[derive(Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub service_key: String,
    pub page_size: usize,
    pub timeout: Duration,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("base_url", &self.base_url)
            .field("service_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub store: StoreConfig,
    pub server_addr: String,
    pub api_prefix: String,

    /// When set, the HTTP trigger requires `Authorization: Bearer <secret>`.
    pub cron_secret: Option<String>,

    // Rate limiting
    pub rate_trigger_per_min: u32,

    /// Fixed civil-time reference that decides what "today" is.
    pub business_offset: FixedOffset,

    pub log_dir: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("store", &self.store)
            .field("server_addr", &self.server_addr)
            .field("api_prefix", &self.api_prefix)
            .field("cron_secret", &self.cron_secret.as_ref().map(|_| "<redacted>"))
            .field("rate_trigger_per_min", &self.rate_trigger_per_min)
            .field("business_offset", &self.business_offset)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, JobError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds and validates the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, JobError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("SUPABASE_URL")
            .or_else(|| get("VITE_SUPABASE_URL"))
            .ok_or_else(|| missing("SUPABASE_URL (or VITE_SUPABASE_URL)"))?;
        let service_key =
            get("SUPABASE_SERVICE_ROLE_KEY").ok_or_else(|| missing("SUPABASE_SERVICE_ROLE_KEY"))?;

        let page_size: usize = parse_or(&get, "STORE_PAGE_SIZE", 1000)?;
        if page_size == 0 {
            return Err(JobError::Configuration(
                "STORE_PAGE_SIZE must be greater than zero".to_string(),
            ));
        }
        let timeout_secs: u64 = parse_or(&get, "STORE_TIMEOUT_SECS", 30)?;

        let offset_minutes: i32 =
            parse_or(&get, "BUSINESS_UTC_OFFSET_MINUTES", DEFAULT_UTC_OFFSET_MINUTES)?;
        let business_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                JobError::Configuration(format!(
                    "BUSINESS_UTC_OFFSET_MINUTES out of range: {}",
                    offset_minutes
                ))
            })?;

        Ok(Self {
            store: StoreConfig {
                base_url: base_url.trim().trim_end_matches('/').to_string(),
                service_key,
                page_size,
                timeout: Duration::from_secs(timeout_secs),
            },
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            api_prefix: get("API_PREFIX").unwrap_or_else(|| "/api".to_string()),
            cron_secret: get("CRON_SECRET"),
            rate_trigger_per_min: parse_or(&get, "RATE_TRIGGER_PER_MIN", 30)?,
            business_offset,
            log_dir: get("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

fn missing(key: &str) -> JobError {
    JobError::Configuration(format!("{} must be set", key))
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, JobError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| JobError::Configuration(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
