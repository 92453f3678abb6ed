use std::process::ExitCode;
use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;
use utoipa_swagger_ui::SwaggerUi;

use hrm_attendance::cli::{self, Cli, Command};
use hrm_attendance::config::Config;
use hrm_attendance::docs;
use hrm_attendance::routes;
use hrm_attendance::store::{RecordsStore, RestStore};

#[get("/")]
async fn index() -> impl Responder {
    "HRM attendance job is running"
}

#[actix_web::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = init_tracing(&config.log_dir);

    let store: Arc<dyn RecordsStore> = match RestStore::new(&config.store) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Failed to build records store client");
            eprintln!("Error: building records store client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Serve => match serve(config, store).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!(error = %format!("{:#}", e), "Server failed");
                eprintln!("Error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Command::Job(command) => {
            let status = cli::run(
                command,
                store.as_ref(),
                config.business_offset,
                Utc::now(),
                &mut std::io::stdout(),
                &mut std::io::stderr(),
            )
            .await;
            ExitCode::from(status)
        }
    }
}

fn init_tracing(log_dir: &str) -> WorkerGuard {
    // Rolling daily log
    let file_appender = rolling::daily(log_dir, "app.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    guard
}

async fn serve(config: Config, store: Arc<dyn RecordsStore>) -> anyhow::Result<()> {
    let limiter = routes::build_limiter(config.rate_trigger_per_min)?;
    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config.clone());
    let store_data: Data<dyn RecordsStore> = Data::from(store);
    let openapi = docs::openapi_for(&config.api_prefix);

    info!(addr = %server_addr, secret_configured = config.cron_secret.is_some(), "Server starting...");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", openapi.clone()),
            )
            .app_data(config_data.clone())
            .app_data(store_data.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, limiter.clone()))
    })
    .bind(&server_addr)
    .with_context(|| format!("binding {}", server_addr))?
    .run()
    .await?;

    Ok(())
}
