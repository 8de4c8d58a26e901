//! Per-request route gating.
//!
//! The decision is a pure function of the token state and the request path;
//! the middleware only reads the cookie, asks the [`TokenIssuer`] and turns
//! the decision into either the downstream response or a redirect.

use crate::auth::token::{TokenIssuer, TOKEN_COOKIE};
use crate::AppState;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpResponse};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/admin";

/// Matched exactly.
pub const PUBLIC_PATHS: &[&str] = &["/", "/login", "/register"];

/// Matched as a whole path segment prefix: `/senior` covers `/senior/id`
/// but not `/seniority`.
pub const PROTECTED_PREFIXES: &[&str] = &["/admin", "/dashboard", "/record", "/senior", "/auth/update"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Absent,
    Invalid,
    Valid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

fn under_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Anything outside both sets is public.
pub fn classify(path: &str) -> PathClass {
    if PROTECTED_PREFIXES.iter().any(|prefix| under_prefix(path, prefix)) {
        PathClass::Protected
    } else {
        PathClass::Public
    }
}

fn is_public_page(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub fn decide(token: TokenState, path: &str) -> GateDecision {
    match (token, classify(path)) {
        (TokenState::Valid, PathClass::Public) if is_public_page(path) => {
            GateDecision::Redirect(LANDING_PATH)
        }
        (TokenState::Valid, _) => GateDecision::Allow,
        (_, PathClass::Protected) => GateDecision::Redirect(LOGIN_PATH),
        (_, PathClass::Public) => GateDecision::Allow,
    }
}

pub fn token_state(tokens: &TokenIssuer, token: Option<&str>) -> TokenState {
    match token {
        None => TokenState::Absent,
        Some(token) if tokens.verify(token).is_some() => TokenState::Valid,
        Some(_) => TokenState::Invalid,
    }
}

pub async fn request_gate(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let cookie = req.cookie(TOKEN_COOKIE);
    let state = match req.app_data::<web::Data<AppState>>() {
        Some(app) => token_state(&app.tokens, cookie.as_ref().map(|c| c.value())),
        // No signing key wired in means nothing can be valid.
        None if cookie.is_some() => TokenState::Invalid,
        None => TokenState::Absent,
    };

    match decide(state, req.path()) {
        GateDecision::Allow => next.call(req).await.map(ServiceResponse::map_into_left_body),
        GateDecision::Redirect(location) => {
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish();
            Ok(req.into_response(response).map_into_right_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_path_partition() {
        assert_eq!(classify("/admin"), PathClass::Protected);
        assert_eq!(classify("/admin/account"), PathClass::Protected);
        assert_eq!(classify("/dashboard"), PathClass::Protected);
        assert_eq!(classify("/senior/delete"), PathClass::Protected);
        assert_eq!(classify("/record"), PathClass::Protected);
        assert_eq!(classify("/auth/update"), PathClass::Protected);
        assert_eq!(classify("/"), PathClass::Public);
        assert_eq!(classify("/login"), PathClass::Public);
        assert_eq!(classify("/auth/login"), PathClass::Public);
        assert_eq!(classify("/registration"), PathClass::Public);
        assert_eq!(classify("/somewhere/else"), PathClass::Public);
    }

    #[test]
    fn test_prefix_stops_at_segment_boundary() {
        assert_eq!(classify("/senior"), PathClass::Protected);
        assert_eq!(classify("/senior/"), PathClass::Protected);
        assert_eq!(classify("/seniority"), PathClass::Public);
        assert_eq!(classify("/records-export"), PathClass::Public);
        assert_eq!(classify("/administrator"), PathClass::Public);
        assert_eq!(classify("/auth/updates"), PathClass::Public);
        assert_eq!(decide(TokenState::Absent, "/seniority"), GateDecision::Allow);
    }

    #[actix_web::test]
    async fn test_gate_wraps_an_app() {
        use actix_web::middleware::from_fn;
        use actix_web::test::{call_service, init_service, TestRequest};
        use actix_web::App;

        let app = init_service(
            App::new()
                .wrap(from_fn(request_gate))
                .route("/record", web::get().to(HttpResponse::Ok))
                .route("/seniority", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/record").to_request()).await;
        assert_eq!(resp.status(), 303);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);

        let resp = call_service(&app, TestRequest::get().uri("/seniority").to_request()).await;
        assert_eq!(resp.status(), 200);
    }

    #[test]
    fn test_decision_table() {
        use GateDecision::*;
        use TokenState::*;

        assert_eq!(decide(Absent, "/login"), Allow);
        assert_eq!(decide(Absent, "/admin"), Redirect(LOGIN_PATH));
        assert_eq!(decide(Invalid, "/login"), Allow);
        assert_eq!(decide(Invalid, "/admin/account"), Redirect(LOGIN_PATH));
        assert_eq!(decide(Valid, "/login"), Redirect(LANDING_PATH));
        assert_eq!(decide(Valid, "/"), Redirect(LANDING_PATH));
        assert_eq!(decide(Valid, "/admin"), Allow);
    }

    #[test]
    fn test_valid_token_on_unlisted_public_path_passes() {
        assert_eq!(decide(TokenState::Valid, "/auth/login"), GateDecision::Allow);
        assert_eq!(decide(TokenState::Valid, "/health"), GateDecision::Allow);
        assert_eq!(decide(TokenState::Absent, "/health"), GateDecision::Allow);
    }

    #[test]
    fn test_token_state() {
        let tokens = TokenIssuer::new(b"gate_secret", Duration::days(1));
        let token = tokens.issue(1, "admin").unwrap();

        assert_eq!(token_state(&tokens, None), TokenState::Absent);
        assert_eq!(token_state(&tokens, Some(&token)), TokenState::Valid);
        assert_eq!(token_state(&tokens, Some("garbage")), TokenState::Invalid);

        let stale = tokens
            .issue_at(1, "admin", chrono::Utc::now() - Duration::days(2))
            .unwrap();
        assert_eq!(token_state(&tokens, Some(&stale)), TokenState::Invalid);
    }
}
