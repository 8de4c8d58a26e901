use crate::config::Settings;
use actix_web::cookie::{time, Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // Credential id
    pub username: String,
    pub iat: i64,         // Issued at
    pub exp: i64,         // Expiration time
}

/// Signs and checks session tokens with the process-wide secret.
///
/// Tokens are not stored anywhere: a token is valid exactly when its signature
/// checks out and `exp` is still in the future.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    secure_cookies: bool,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            secure_cookies: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut issuer = Self::new(
            settings.auth.jwt_secret.as_bytes(),
            Duration::hours(settings.auth.token_expiry_hours),
        );
        issuer.secure_cookies = settings.is_production();
        issuer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject_id: i32, username: &str) -> Result<String, AppError> {
        self.issue_at(subject_id, username, Utc::now())
    }

    pub fn issue_at(&self, subject_id: i32, username: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign token: {}", e)))
    }

    /// `None` for anything that is not a live token signed with our secret.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if data.claims.exp > Utc::now().timestamp() => Some(data.claims),
            Ok(_) => {
                debug!("Token rejected: expired");
                None
            }
            Err(e) => {
                debug!("Token rejected: {}", e);
                None
            }
        }
    }

    /// The HTTP-only session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .finish()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(TOKEN_COOKIE, "")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Strict)
            .path("/")
            .finish();
        cookie.make_removal();
        cookie
    }
}
