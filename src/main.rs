//! Article extractor server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use article_extractor_lib::api;
use article_extractor_lib::auth::AuthKey;
use article_extractor_lib::config::Config;
use article_extractor_lib::middleware::RequestLogger;
use article_extractor_lib::services::{ContentExtractor, ReadabilityExtractor};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(std::io::Error::other)?;

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, EXTRACTOR_AUTH_KEY must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Article Extractor");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development default for EXTRACTOR_AUTH_KEY unless set");
    }

    let extractor = match ReadabilityExtractor::new(&config.fetch) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Failed to initialize extractor: {}", e);
            std::process::exit(1);
        }
    };
    let extractor: Arc<dyn ContentExtractor> = Arc::new(extractor);
    let extractor = web::Data::from(extractor);
    let auth_key = web::Data::new(AuthKey::new(config.auth_key.clone()));

    let bind_address = config.bind_address();
    info!(
        "Starting server at http://{} ({} workers)",
        bind_address, config.workers
    );

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .app_data(auth_key.clone())
            .app_data(extractor.clone())
            .configure(api::configure_health_routes)
            .configure(api::configure_extract_routes)
            .configure(api::configure_doc_routes)
    })
    .workers(config.workers)
    .bind(&bind_address)?
    .run()
    .await
}
