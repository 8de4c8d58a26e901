use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use crate::AppState;
use crate::auth::service::AccountUpdate;
use crate::auth::token::TOKEN_COOKIE;
use crate::error::{AppError, AuthError};
use crate::logging::log_request;
use tracing::{info, error};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    log_request(&req, Some(&json!({ "username": body.username })));

    let (username, password) = match (body.username.as_deref(), body.password.as_deref()) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u.trim(), p),
        _ => return Err(AppError::ValidationError("Username and password are required".into())),
    };

    match state.credentials.login(username, password).await {
        Ok(session) => {
            info!("Login successful for user: {}", session.username);
            let cookie = state.tokens.session_cookie(session.token.clone());
            Ok(HttpResponse::Ok().cookie(cookie).json(session))
        }
        Err(e) => {
            error!("Login failed for user: {}: {}", username, e);
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AccountUpdateRequest {
    pub oldpassword: Option<String>,
    pub newusername: Option<String>,
    pub newpassword: Option<String>,
}

pub async fn update_account(
    req: HttpRequest,
    body: web::Json<AccountUpdateRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    log_request(&req, Some(&json!({ "newusername": body.newusername })));

    let update = AccountUpdate::new(body.oldpassword, body.newusername, body.newpassword)?;
    state.credentials.update_account(&update).await?;
    info!("Account credentials changed to username: {}", update.new_username());

    Ok(HttpResponse::Ok().json(json!({
        "message": "Username and password updated successfully"
    })))
}

pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    log_request::<()>(&req, None);

    HttpResponse::Ok()
        .cookie(state.tokens.removal_cookie())
        .json(json!({ "message": "Successfully logged out" }))
}

/// Re-issues the session cookie for a still-valid token.
pub async fn refresh(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    log_request::<()>(&req, None);

    let claims = req
        .cookie(TOKEN_COOKIE)
        .and_then(|cookie| state.tokens.verify(cookie.value()))
        .ok_or(AuthError::InvalidToken)?;

    let subject_id: i32 = claims
        .sub
        .parse()
        .map_err(|_| AuthError::InvalidToken)?;
    let token = state.tokens.issue(subject_id, &claims.username)?;

    Ok(HttpResponse::Ok()
        .cookie(state.tokens.session_cookie(token.clone()))
        .json(json!({ "id": subject_id, "username": claims.username, "token": token })))
}
