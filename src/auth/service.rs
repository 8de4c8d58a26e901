use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::db::credentials::CredentialStore;
use crate::error::{AppError, AuthError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i32,
    pub username: String,
    pub token: String,
}

/// A complete account change. Construction enforces that every field is
/// present, so the service never sees a half-specified update.
#[derive(Clone)]
pub struct AccountUpdate {
    old_password: String,
    new_username: String,
    new_password: String,
}

impl AccountUpdate {
    pub fn new(
        old_password: Option<String>,
        new_username: Option<String>,
        new_password: Option<String>,
    ) -> Result<Self, AppError> {
        let old_password = old_password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::ValidationError("Old password is required".into()))?;

        match (
            new_username.filter(|u| !u.trim().is_empty()),
            new_password.filter(|p| !p.is_empty()),
        ) {
            (Some(new_username), Some(new_password)) => Ok(Self {
                old_password,
                new_username: new_username.trim().to_string(),
                new_password,
            }),
            _ => Err(AppError::ValidationError(
                "New username and new password are required".into(),
            )),
        }
    }

    pub fn new_username(&self) -> &str {
        &self.new_username
    }
}

pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenIssuer>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let credential = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !verify_password(password, &credential.password_hash)? {
            warn!("Rejected login for {}: invalid credentials", username);
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.tokens.issue(credential.id, &credential.username)?;
        info!("Issued session for credential {}", credential.id);

        Ok(Session {
            id: credential.id,
            username: credential.username,
            token,
        })
    }

    /// Swaps username and password of the authoritative credential. Nothing is
    /// written unless the old password checks out.
    pub async fn update_account(&self, update: &AccountUpdate) -> Result<(), AppError> {
        let credential = self
            .store
            .primary()
            .await?
            .ok_or(AuthError::UnknownUser)?;

        if !verify_password(&update.old_password, &credential.password_hash)? {
            warn!("Rejected account update for credential {}: wrong password", credential.id);
            return Err(AuthError::IncorrectPassword.into());
        }

        let new_hash = hash_password(&update.new_password)?;
        if !self
            .store
            .replace(credential.id, &update.new_username, &new_hash)
            .await?
        {
            return Err(AuthError::UnknownUser.into());
        }

        info!("Updated credential {}", credential.id);
        Ok(())
    }

    /// Creates the first credential when the table is still empty.
    /// Returns whether a row was created.
    pub async fn bootstrap(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if self.store.primary().await?.is_some() {
            return Ok(false);
        }
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::ConfigError(
                "bootstrap username and password must not be empty".into(),
            ));
        }

        let id = self
            .store
            .insert(username.trim(), &hash_password(password)?)
            .await?;
        info!("Bootstrapped credential {} for {}", id, username.trim());
        Ok(true)
    }
}
