use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use scholar_match::config::Settings;
use scholar_match::core::Matcher;
use scholar_match::routes::{self, handle_json_payload_error, handle_query_payload_error, AppState};
use scholar_match::services::{CatalogStore, ProfileStore};
use std::io::{Error, ErrorKind};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so the config file can set the level
    let settings = Settings::load();

    let (default_level, default_format) = match &settings {
        Ok(s) => (s.logging.level.clone(), s.logging.format.clone()),
        Err(_) => ("info".to_string(), "compact".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(default_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(default_format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    info!("Starting ScholarMatch service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        Error::new(ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    // Initialize matcher with configured weights
    let model = settings.scoring.to_model();
    let matcher = Matcher::try_new(model)
        .map_err(|e| {
            error!("Invalid scoring configuration: {}", e);
            Error::new(ErrorKind::InvalidInput, e.to_string())
        })?
        .with_min_score(settings.matching.min_score)
        .with_exclude_expired(settings.matching.exclude_expired);

    info!(
        "Matcher initialized with weights: {:?} (min score {})",
        model.weights,
        matcher.min_score()
    );

    let catalog = CatalogStore::open(&settings.catalog.path).await.map_err(|e| {
        error!("Failed to load scholarship catalog: {}", e);
        Error::new(ErrorKind::Other, e.to_string())
    })?;

    let profiles = ProfileStore::new(&settings.profiles.path);

    info!(
        "Catalog loaded from {:?}, profiles stored in {:?}",
        settings.catalog.path,
        settings.profiles.path
    );

    // Build application state
    let app_state = AppState {
        catalog: Arc::new(catalog),
        profiles: Arc::new(profiles),
        matcher,
        default_limit: settings.matching.default_limit,
        max_limit: settings.matching.max_limit,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
