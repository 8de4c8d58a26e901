use crate::db::models::{Credential, RecordId};
use crate::db::query::QueryDescriptor;
use crate::db::repository::Repository;
use crate::error::DatabaseError;
use async_trait::async_trait;

/// Access to the `auth` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError>;

    /// The authoritative credential, i.e. the lowest-id row.
    async fn primary(&self) -> Result<Option<Credential>, DatabaseError>;

    /// Replaces username and hash together in one statement. Returns whether a
    /// row matched `id`.
    async fn replace(&self, id: i32, username: &str, password_hash: &str) -> Result<bool, DatabaseError>;

    async fn insert(&self, username: &str, password_hash: &str) -> Result<i32, DatabaseError>;
}

pub struct PgCredentialStore {
    repo: Repository,
}

impl PgCredentialStore {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        let rows: Vec<Credential> = self
            .repo
            .execute(
                QueryDescriptor::new("SELECT id, username, password FROM auth WHERE username = $1")
                    .bind(username),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn primary(&self) -> Result<Option<Credential>, DatabaseError> {
        let rows: Vec<Credential> = self
            .repo
            .execute(QueryDescriptor::new(
                "SELECT id, username, password FROM auth ORDER BY id ASC LIMIT 1",
            ))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn replace(&self, id: i32, username: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let rows: Vec<RecordId> = self
            .repo
            .execute(
                QueryDescriptor::new("UPDATE auth SET username = $1, password = $2 WHERE id = $3 RETURNING id")
                    .bind(username)
                    .bind(password_hash)
                    .bind(id),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<i32, DatabaseError> {
        let rows: Vec<RecordId> = self
            .repo
            .execute(
                QueryDescriptor::new("INSERT INTO auth (username, password) VALUES ($1, $2) RETURNING id")
                    .bind(username)
                    .bind(password_hash),
            )
            .await?;
        rows.first()
            .map(|row| row.id)
            .ok_or_else(|| DatabaseError::QueryError("INSERT returned no id".into()))
    }
}
