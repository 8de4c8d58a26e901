use crate::db::models::{EmergencyContact, ResidentFields};
use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Resident fields as they arrive on the wire. Everything is optional here so
/// that a missing field becomes a 400 naming the field, not a decode error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResidentPayload {
    pub applicationtype: Option<String>,
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    pub sex: Option<String>,
    pub dateofbirth: Option<String>,
    pub placeofbirth: Option<String>,
    pub civilstatus: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub barangay: Option<String>,
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub contact: Option<String>,
    pub health: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ResidentUpdatePayload {
    pub id: Option<Value>,
    #[serde(flatten)]
    pub fields: ResidentPayload,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct IdPayload {
    pub id: Option<Value>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    present(value).ok_or_else(|| AppError::ValidationError(format!("Missing required field: {}", field)))
}

fn parse_date_of_birth(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| {
            AppError::ValidationError("dateofbirth must be a date in YYYY-MM-DD format".into())
        })?;

    if date > today {
        return Err(AppError::ValidationError("dateofbirth must not be in the future".into()));
    }
    Ok(date)
}

impl ResidentPayload {
    pub fn validate(self) -> Result<ResidentFields, AppError> {
        self.validate_as_of(Utc::now().date_naive())
    }

    pub fn validate_as_of(self, today: NaiveDate) -> Result<ResidentFields, AppError> {
        let application_type = required(self.applicationtype, "applicationtype")?;
        let first_name = required(self.firstname, "firstname")?;
        let last_name = required(self.lastname, "lastname")?;
        let sex = required(self.sex, "sex")?;
        let date_of_birth = parse_date_of_birth(&required(self.dateofbirth, "dateofbirth")?, today)?;
        let place_of_birth = required(self.placeofbirth, "placeofbirth")?;
        let civil_status = required(self.civilstatus, "civilstatus")?;
        let education = required(self.education, "education")?;
        let occupation = required(self.occupation, "occupation")?;
        let barangay = required(self.barangay, "barangay")?;

        // The emergency contact is all or nothing.
        let emergency_contact = match (present(self.name), present(self.relationship), present(self.contact)) {
            (Some(name), Some(relationship), Some(phone_number)) => EmergencyContact {
                name,
                relationship,
                phone_number,
            },
            _ => {
                return Err(AppError::ValidationError(
                    "Emergency contact name, relationship and contact are all required".into(),
                ))
            }
        };

        Ok(ResidentFields {
            application_type,
            first_name,
            middle_name: present(self.middlename),
            last_name,
            sex,
            date_of_birth,
            place_of_birth,
            civil_status,
            education,
            occupation,
            barangay,
            emergency_contact,
            health_notes: present(self.health),
        })
    }
}

/// Accepts a positive integer or a string holding one.
pub fn parse_id(value: Option<&Value>) -> Result<i32, AppError> {
    let id = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    id.filter(|id| *id > 0)
        .and_then(|id| i32::try_from(id).ok())
        .ok_or_else(|| AppError::ValidationError("Valid ID parameter is required".into()))
}

impl ResidentUpdatePayload {
    pub fn validate(self) -> Result<(i32, ResidentFields), AppError> {
        let id = parse_id(self.id.as_ref())?;
        Ok((id, self.fields.validate()?))
    }
}

impl IdPayload {
    pub fn validate(&self) -> Result<i32, AppError> {
        parse_id(self.id.as_ref())
    }
}
