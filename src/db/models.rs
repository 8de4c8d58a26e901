use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The staff login row. `password_hash` only ever holds an argon2 PHC string.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct Credential {
    pub id: i32,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Emergency contact, stored as three NOT NULL columns on the resident row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    #[serde(rename = "contact")]
    #[sqlx(rename = "contact")]
    pub phone_number: String,
}

/// A validated resident, ready to be written. Produced only by the payload
/// validators so every field group is complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidentFields {
    #[serde(rename = "applicationtype")]
    pub application_type: String,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "middlename")]
    pub middle_name: Option<String>,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub sex: String,
    #[serde(rename = "dateofbirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "placeofbirth")]
    pub place_of_birth: String,
    #[serde(rename = "civilstatus")]
    pub civil_status: String,
    pub education: String,
    pub occupation: String,
    pub barangay: String,
    #[serde(flatten)]
    pub emergency_contact: EmergencyContact,
    #[serde(rename = "health")]
    pub health_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Resident {
    pub id: i32,
    #[serde(rename = "applicationtype")]
    #[sqlx(rename = "applicationtype")]
    pub application_type: String,
    #[serde(rename = "firstname")]
    #[sqlx(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "middlename")]
    #[sqlx(rename = "middlename")]
    pub middle_name: Option<String>,
    #[serde(rename = "lastname")]
    #[sqlx(rename = "lastname")]
    pub last_name: String,
    pub sex: String,
    #[serde(rename = "dateofbirth")]
    #[sqlx(rename = "dateofbirth")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "placeofbirth")]
    #[sqlx(rename = "placeofbirth")]
    pub place_of_birth: String,
    #[serde(rename = "civilstatus")]
    #[sqlx(rename = "civilstatus")]
    pub civil_status: String,
    pub education: String,
    pub occupation: String,
    pub barangay: String,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub emergency_contact: EmergencyContact,
    #[serde(rename = "health")]
    #[sqlx(rename = "health")]
    pub health_notes: Option<String>,
}

impl Resident {
    pub fn from_fields(id: i32, fields: ResidentFields) -> Self {
        Self {
            id,
            application_type: fields.application_type,
            first_name: fields.first_name,
            middle_name: fields.middle_name,
            last_name: fields.last_name,
            sex: fields.sex,
            date_of_birth: fields.date_of_birth,
            place_of_birth: fields.place_of_birth,
            civil_status: fields.civil_status,
            education: fields.education,
            occupation: fields.occupation,
            barangay: fields.barangay,
            emergency_contact: fields.emergency_contact,
            health_notes: fields.health_notes,
        }
    }
}

/// One line of the roster table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ResidentSummary {
    pub id: i32,
    pub name: String,
    pub sex: String,
    pub status: String,
    pub occupation: String,
    pub age: Option<i32>,
    pub applicationtype: String,
}

impl ResidentSummary {
    /// Mirrors the roster query: full name with the middle name only when
    /// present, age in whole years as of `today`.
    pub fn from_resident(resident: &Resident, today: NaiveDate) -> Self {
        let name = [
            Some(resident.first_name.as_str()),
            resident.middle_name.as_deref().filter(|m| !m.is_empty()),
            Some(resident.last_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        Self {
            id: resident.id,
            name,
            sex: resident.sex.clone(),
            status: resident.civil_status.clone(),
            occupation: resident.occupation.clone(),
            age: today.years_since(resident.date_of_birth).map(|years| years as i32),
            applicationtype: resident.application_type.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct RecordId {
    pub id: i32,
}
