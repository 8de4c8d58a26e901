//! Database module for the registry server
//!
//! Everything that touches Postgres goes through [`Repository::execute`]
//! with a [`QueryDescriptor`]; the store traits are what the rest of the
//! crate depends on.

pub mod credentials;
pub mod models;
pub mod query;
pub mod repository;
pub mod residents;

pub use credentials::{CredentialStore, PgCredentialStore};
pub use models::{Credential, EmergencyContact, RecordId, Resident, ResidentFields, ResidentSummary};
pub use query::{QueryDescriptor, SqlParam};
pub use repository::{DbPoolStatus, Repository};
pub use residents::{PgResidentStore, ResidentStore};
