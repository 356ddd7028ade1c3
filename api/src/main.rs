//! Server entry point: configuration, connection pools and the actix app.

use std::io;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use sp_api::middleware::{cors, RequestRateLimit, SecurityMiddleware, SessionGuard};
use sp_api::routes;
use sp_api::state::AppState;
use sp_infra::cache::RedisClient;
use sp_infra::database::DatabasePool;
use sp_shared::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> io::Result<()> {
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();

    let config = AppConfig::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.directive()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if environment.is_production() && config.credential.is_using_default_secret() {
        error!("default credential secret detected in production, refusing to start");
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CREDENTIAL_SECRET must be set in production",
        ));
    }

    info!(%environment, "starting spotless api");

    let db = DatabasePool::new(config.database.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    let cache = RedisClient::connect(config.cache.clone())
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;

    let state = web::Data::new(
        AppState::assemble(&config, db, cache)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?,
    );

    let bind_address = config.server.bind_address();
    let cors_config = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let keep_alive = config.server.keep_alive;
    let workers = config.server.workers;

    info!(address = %bind_address, "listening");

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::JsonConfig::default().limit(max_payload_size))
            .wrap(SessionGuard)
            .wrap(RequestRateLimit)
            .wrap(cors::build(&cors_config))
            .wrap(SecurityMiddleware::for_environment(environment))
            .wrap(TracingLogger::default())
            .configure(routes::configure)
    })
    .keep_alive(Duration::from_secs(keep_alive))
    .bind(&bind_address)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}
