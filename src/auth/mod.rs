pub mod cron_secret;
pub mod middleware;
