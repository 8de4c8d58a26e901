//! Authentication module for the registry server
//!
//! Password hashing, session tokens, the request gate, and the credential
//! flows built on top of them.

pub mod gate;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use service::{AccountUpdate, CredentialService, Session};
pub use token::{Claims, TokenIssuer, TOKEN_COOKIE};
