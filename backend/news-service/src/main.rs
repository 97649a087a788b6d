use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use news_service::db::{connect, MongoNewsRepository, MongoSettings};
use news_service::handlers;
use news_service::openapi::ApiDoc;
use news_service::services::NewsService;
use news_service::telemetry;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;

        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await
    }
}

/// Probe the local health endpoint; used as a container healthcheck.
async fn run_healthcheck(port: u16) -> io::Result<()> {
    let url = format!("http://127.0.0.1:{}/api/v1/health", port);
    match reqwest::Client::new().get(&url).send().await {
        Ok(resp) if resp.status().is_success() => Ok(()),
        Ok(resp) => {
            eprintln!("healthcheck HTTP status: {}", resp.status());
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck failed"))
        }
        Err(e) => {
            eprintln!("healthcheck HTTP error: {}", e);
            Err(io::Error::new(io::ErrorKind::Other, "healthcheck error"))
        }
    }
}

/// News Service
///
/// Serves create, list, search, update and delete operations for news items
/// stored in a MongoDB collection.
///
/// # Routes
///
/// - `POST /`, `GET /` - Create and list news
/// - `GET /{q}` - Search news
/// - `PUT /{id}`, `DELETE /{id}` - Update and delete a news item
/// - `/api/v1/health/*`, `/api/v1/metrics`, `/api/v1/openapi.json` - Operations
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load configuration
    let config = match news_service::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Support container healthchecks via CLI subcommand
    if let Some(cmd) = std::env::args().nth(1) {
        if cmd == "healthcheck" || cmd == "healthcheck-http" {
            return run_healthcheck(config.http_port).await;
        }
    }

    telemetry::init_tracing(config.log_format);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {:#}", e);
        std::process::exit(1);
    }

    tracing::info!("Starting news-service v{}", env!("CARGO_PKG_VERSION"));
    config.log_config();

    let client = match connect(&MongoSettings::from_config(&config)).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("MongoDB client creation failed: {}", e);
            std::process::exit(1);
        }
    };

    let repo = MongoNewsRepository::new(&client, &config.mongodb_database, &config.mongodb_collection);
    tracing::info!(collection = repo.collection_name(), "News repository ready");

    let service = web::Data::new(NewsService::new(Arc::new(repo), config.request_timeout()));

    let http_bind_address = config.bind_address();
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.allowed_origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(service.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url(ApiDoc::openapi_json_path(), ApiDoc::openapi()),
            )
            .configure(handlers::configure)
    })
    .bind(&http_bind_address)?
    .workers(config.http_workers)
    .disable_signals()
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let result = tokio::select! {
        joined = &mut server_task => {
            match joined {
                Ok(result) => result,
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
            }
        }
        signal = shutdown_signal() => {
            if let Err(e) = signal {
                tracing::warn!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            match server_task.await {
                Ok(result) => result,
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
            }
        }
    };

    tracing::info!("Closing MongoDB client");
    client.shutdown().await;

    tracing::info!("News-service shutting down");
    result
}
