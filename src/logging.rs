use actix_web::HttpRequest;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

/// Installs the global subscriber. `RUST_LOG` wins over the `info` default.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("Global tracing subscriber already installed");
    }
}

/// Logs one inbound API request. Callers pass only fields that are safe to
/// log; passwords never go in here.
pub fn log_request<T: Serialize + ?Sized>(req: &HttpRequest, safe_payload: Option<&T>) -> Uuid {
    let request_id = Uuid::new_v4();
    let payload = safe_payload
        .and_then(|p| serde_json::to_string(p).ok())
        .unwrap_or_else(|| "-".to_string());

    info!(
        request_id = %request_id,
        method = %req.method(),
        path = %req.path(),
        payload = %payload,
        "Inbound request"
    );
    request_id
}
