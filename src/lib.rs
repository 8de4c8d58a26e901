pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod residents;

use std::sync::Arc;
use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest, HttpResponse};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

use auth::{CredentialService, TokenIssuer};
use db::{CredentialStore, PgCredentialStore, PgResidentStore, Repository, ResidentStore};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp, plus pool
/// occupancy when a database is attached
pub async fn health_check(state: Option<web::Data<AppState>>) -> HttpResponse {
    let pool = state
        .as_ref()
        .and_then(|state| state.repository.as_ref())
        .map(Repository::pool_status);

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": pool
    }))
}

/// Application state shared across all workers. Built once at startup; the
/// signing key and the pool live here instead of in globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub tokens: Arc<TokenIssuer>,
    pub credentials: Arc<CredentialService>,
    pub residents: Arc<dyn ResidentStore>,
    pub repository: Option<Repository>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let repository = Repository::connect(&config.database).await?;
        sqlx::migrate!().run(repository.pool()).await?;
        info!("Database migrations applied");

        let credentials = Arc::new(PgCredentialStore::new(repository.clone()));
        let residents = Arc::new(PgResidentStore::new(repository.clone()));

        let mut state = Self::from_parts(config, credentials, residents);
        state.repository = Some(repository);
        Ok(state)
    }

    /// Wires the state around arbitrary stores.
    pub fn from_parts(
        config: Settings,
        credential_store: Arc<dyn CredentialStore>,
        residents: Arc<dyn ResidentStore>,
    ) -> Self {
        let tokens = Arc::new(TokenIssuer::from_settings(&config));
        let credentials = Arc::new(CredentialService::new(credential_store, tokens.clone()));

        Self {
            config: Arc::new(config),
            tokens,
            credentials,
            residents,
            repository: None,
        }
    }

    /// Seeds the first credential if one is configured and none exists yet.
    pub async fn bootstrap_credential(&self) -> Result<bool> {
        match (
            self.config.auth.bootstrap_username.as_deref(),
            self.config.auth.bootstrap_password.as_deref(),
        ) {
            (Some(username), Some(password)) => self.credentials.bootstrap(username, password).await,
            _ => Ok(false),
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(repository) = &self.repository {
            repository.close().await;
        }
        Ok(())
    }
}

/// Undecodable bodies never reach a handler, so the request is logged here.
fn reject_json(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    logging::log_request::<()>(req, None);
    AppError::ValidationError(format!("Invalid request body: {}", err)).into()
}

/// JSON bodies that fail to decode become a 400 with the usual envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(reject_json)
}

/// The full route table.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health_check))
        .route("/auth/login", web::post().to(auth::handlers::login))
        .route("/auth/update", web::put().to(auth::handlers::update_account))
        .route("/auth/logout", web::post().to(auth::handlers::logout))
        .route("/auth/refresh", web::post().to(auth::handlers::refresh))
        .route("/record", web::get().to(residents::handlers::list_records))
        .route("/registration", web::post().to(residents::handlers::register_resident))
        .route("/senior/id", web::post().to(residents::handlers::fetch_resident))
        .route("/senior/update", web::put().to(residents::handlers::update_resident))
        .route("/senior/delete", web::delete().to(residents::handlers::delete_resident));
}
