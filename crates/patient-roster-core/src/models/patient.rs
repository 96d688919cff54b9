//! Patient models.

use serde::{Deserialize, Serialize};

use super::{Department, Gender, PatientInput, PatientStatus};

/// A patient record as held by the store or returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Unique ID - minted at creation, never changed
    pub id: String,
    /// Patient name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender
    pub gender: Gender,
    /// Admitting department
    pub department: Department,
    /// Contact phone number
    #[serde(default, deserialize_with = "empty_as_none")]
    pub phone: Option<String>,
    /// Home address
    #[serde(default, deserialize_with = "empty_as_none")]
    pub address: Option<String>,
    /// Free-text clinical notes
    #[serde(default, deserialize_with = "empty_as_none")]
    pub notes: Option<String>,
    /// Admission timestamp (ISO-8601), set at creation
    pub admission_date: String,
    /// Admission status
    #[serde(default)]
    pub status: PatientStatus,
}

impl Patient {
    /// Create a new admitted patient from validated input.
    pub fn new(id: String, input: PatientInput) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            gender: input.gender,
            department: input.department,
            phone: input.phone,
            address: input.address,
            notes: input.notes,
            admission_date: chrono::Utc::now().to_rfc3339(),
            status: input.status.unwrap_or_default(),
        }
    }

    /// Overwrite every form-editable field; `id` and `admission_date` survive.
    pub fn apply(&mut self, input: PatientInput) {
        self.name = input.name;
        self.age = input.age;
        self.gender = input.gender;
        self.department = input.department;
        self.phone = input.phone;
        self.address = input.address;
        self.notes = input.notes;
        if let Some(status) = input.status {
            self.status = status;
        }
    }

    /// Phone number, or empty text when none is recorded.
    pub fn phone_or_empty(&self) -> &str {
        self.phone.as_deref().unwrap_or("")
    }
}

/// The backend writes absent optional fields as `""`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
