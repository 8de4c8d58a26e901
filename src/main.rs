use actix_cors::Cors;
use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use senior_registry::auth::gate::request_gate;
use senior_registry::{configure, logging, AppState, Settings};
use senior_registry::config::CorsConfig;
use std::net::TcpListener;
use tracing::{info, warn};

fn cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let cors = if config.allow_any_origin {
        Cors::default().allow_any_origin()
    } else {
        config
            .origins()
            .into_iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec!["Content-Type"])
        .supports_credentials()
        .max_age(config.max_age as usize)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let config = Settings::new().context("Failed to load configuration")?;
    info!("Configuration loaded for environment: {}", config.environment);

    let state = AppState::new(config.clone())
        .await
        .context("Failed to initialise application state")?;

    if state.bootstrap_credential().await? {
        info!("Created initial staff credential");
    } else if config.auth.bootstrap_password.is_some() {
        warn!("Ignoring bootstrap credential: the auth table is already populated");
    }

    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;
    info!("Starting server at {}:{}", config.server.host, config.server.port);

    let data = web::Data::new(state.clone());
    let cors_config = config.cors.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(request_gate))
            .wrap(cors(&cors_config))
            .app_data(data.clone())
            .configure(configure)
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await?;

    state.shutdown().await?;
    info!("Server stopped");
    Ok(())
}
