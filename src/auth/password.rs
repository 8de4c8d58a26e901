use crate::error::AppError;
use argon2::{
    password_hash::{Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

/// Hash a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AppError::InternalError(format!("Failed to hash password: {}", e))
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`. A malformed hash or a failing primitive is an
/// error, never a silent "no match".
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        error!("Invalid password hash: {}", e);
        AppError::InternalError(format!("Invalid password hash: {}", e))
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => {
            debug!("Password verification succeeded");
            Ok(true)
        }
        Err(HashError::Password) => {
            debug!("Password verification failed");
            Ok(false)
        }
        Err(e) => {
            error!("Password verification error: {}", e);
            Err(AppError::InternalError(format!("Password verification error: {}", e)))
        }
    }
}
