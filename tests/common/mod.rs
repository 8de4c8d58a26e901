#![allow(dead_code)] // each test binary uses a different subset

use async_trait::async_trait;
use chrono::Utc;
use senior_registry::auth::password::hash_password;
use senior_registry::db::{Credential, CredentialStore, Resident, ResidentFields, ResidentStore, ResidentSummary};
use senior_registry::error::DatabaseError;
use senior_registry::{AppState, Settings};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password123";

/// `auth` table stand-in with the same unique-username rule.
#[derive(Default)]
pub struct MemoryCredentials {
    rows: RwLock<Vec<Credential>>,
}

impl MemoryCredentials {
    pub async fn snapshot(&self) -> Vec<Credential> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        Ok(self.rows.read().await.iter().find(|c| c.username == username).cloned())
    }

    async fn primary(&self) -> Result<Option<Credential>, DatabaseError> {
        Ok(self.rows.read().await.iter().min_by_key(|c| c.id).cloned())
    }

    async fn replace(&self, id: i32, username: &str, password_hash: &str) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.id != id && c.username == username) {
            return Err(DatabaseError::Duplicate);
        }
        match rows.iter_mut().find(|c| c.id == id) {
            Some(row) => {
                row.username = username.to_string();
                row.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert(&self, username: &str, password_hash: &str) -> Result<i32, DatabaseError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|c| c.username == username) {
            return Err(DatabaseError::Duplicate);
        }
        let id = rows.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        rows.push(Credential {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        });
        Ok(id)
    }
}

/// `senior` table stand-in.
#[derive(Default)]
pub struct MemoryResidents {
    rows: RwLock<BTreeMap<i32, Resident>>,
}

impl MemoryResidents {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl ResidentStore for MemoryResidents {
    async fn list_summaries(&self) -> Result<Vec<ResidentSummary>, DatabaseError> {
        let today = Utc::now().date_naive();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .map(|r| ResidentSummary::from_resident(r, today))
            .collect())
    }

    async fn find(&self, id: i32) -> Result<Option<Resident>, DatabaseError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.rows.read().await.contains_key(&id))
    }

    async fn insert(&self, fields: &ResidentFields) -> Result<i32, DatabaseError> {
        let mut rows = self.rows.write().await;
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        rows.insert(id, Resident::from_fields(id, fields.clone()));
        Ok(id)
    }

    async fn update(&self, id: i32, fields: &ResidentFields) -> Result<bool, DatabaseError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) => {
                *row = Resident::from_fields(id, fields.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

pub struct TestContext {
    pub state: AppState,
    pub credentials: Arc<MemoryCredentials>,
    pub residents: Arc<MemoryResidents>,
}

/// State over in-memory stores, seeded with one staff credential.
pub async fn context() -> TestContext {
    let credentials = Arc::new(MemoryCredentials::default());
    credentials
        .insert(USERNAME, &hash_password(PASSWORD).unwrap())
        .await
        .unwrap();
    let residents = Arc::new(MemoryResidents::default());

    let settings = Settings::new_for_test().expect("Failed to load test config");
    let state = AppState::from_parts(settings, credentials.clone(), residents.clone());

    TestContext {
        state,
        credentials,
        residents,
    }
}

pub fn registration() -> Value {
    json!({
        "applicationtype": "New",
        "firstname": "Ana",
        "middlename": "Reyes",
        "lastname": "Cruz",
        "sex": "Female",
        "dateofbirth": "1950-01-01",
        "placeofbirth": "Cebu City",
        "civilstatus": "Widowed",
        "education": "College",
        "occupation": "Farmer",
        "barangay": "Barangay 1",
        "name": "Ben Cruz",
        "relationship": "Child",
        "contact": "0917123456",
        "health": "Hypertension"
    })
}

/// The app exactly as `main` assembles it, minus CORS.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::from_fn(senior_registry::auth::gate::request_gate))
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(senior_registry::configure),
        )
        .await
    };
}

/// Logs in through the API and returns the session cookie value.
macro_rules! login_cookie {
    ($app:expr, $username:expr, $password:expr) => {{
        let resp = actix_web::test::TestRequest::post()
            .uri("/auth/login")
            .set_json(serde_json::json!({ "username": $username, "password": $password }))
            .send_request(&$app)
            .await;
        assert_eq!(resp.status(), 200, "login should succeed");
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .expect("login sets the token cookie")
            .into_owned();
        actix_web::cookie::Cookie::new("token", cookie.value().to_string())
    }};
}
