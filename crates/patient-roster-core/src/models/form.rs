//! Edit-form payloads and validation.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use super::{Department, Gender, Patient, PatientStatus};

/// Validation errors. Nothing is mutated when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Age must be a positive whole number, got {0:?}")]
    InvalidAge(String),
}

/// Raw form contents as typed by a user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientForm {
    /// Set when editing an existing record
    pub id: Option<String>,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub department: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
    /// Optional status override
    pub status: Option<String>,
}

/// Validated patient fields, minus identity. Also the JSON body sent to
/// `POST /patients` and `PUT /patients/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientInput {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub department: Department,
    #[serde(serialize_with = "none_as_empty")]
    pub phone: Option<String>,
    #[serde(serialize_with = "none_as_empty")]
    pub address: Option<String>,
    #[serde(serialize_with = "none_as_empty")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PatientStatus>,
}

impl PatientForm {
    /// The record ID to update, if any.
    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Check required fields and parse the age.
    pub fn validate(&self) -> Result<PatientInput, ValidationError> {
        let name = required(&self.name, "name")?;
        let age_text = required(&self.age, "age")?;
        let gender = required(&self.gender, "gender")?;
        let department = required(&self.department, "department")?;

        let age = match age_text.parse::<u32>() {
            Ok(age) if age > 0 => age,
            _ => return Err(ValidationError::InvalidAge(age_text.to_string())),
        };

        Ok(PatientInput {
            name: name.to_string(),
            age,
            gender: Gender::from(gender),
            department: Department::from(department),
            phone: optional(&self.phone),
            address: optional(&self.address),
            notes: optional(&self.notes),
            status: self
                .status
                .as_deref()
                .and_then(optional)
                .map(PatientStatus::from),
        })
    }
}

impl From<&Patient> for PatientForm {
    fn from(patient: &Patient) -> Self {
        Self {
            id: Some(patient.id.clone()),
            name: patient.name.clone(),
            age: patient.age.to_string(),
            gender: patient.gender.to_string(),
            department: patient.department.to_string(),
            phone: patient.phone.clone().unwrap_or_default(),
            address: patient.address.clone().unwrap_or_default(),
            notes: patient.notes.clone().unwrap_or_default(),
            status: Some(patient.status.to_string()),
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn none_as_empty<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}
