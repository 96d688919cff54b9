//! Enumerated patient attributes.
//!
//! Each vocabulary travels as plain text on the wire and in SQLite. Values
//! outside the known set are kept verbatim in an `Other` variant so records
//! written by another client never fail to load.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Patient gender.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(value) => value,
        }
    }
}

impl From<String> for Gender {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other(value.trim().to_string()),
        }
    }
}

impl From<&str> for Gender {
    fn from(value: &str) -> Self {
        Gender::from(value.to_string())
    }
}

impl From<Gender> for String {
    fn from(value: Gender) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hospital department a patient is admitted to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Department {
    Cardiology,
    Orthopedics,
    Neurology,
    Pediatrics,
    GeneralMedicine,
    Other(String),
}

impl Department {
    /// Departments offered by the edit form.
    pub const KNOWN: [Department; 5] = [
        Department::Cardiology,
        Department::Orthopedics,
        Department::Neurology,
        Department::Pediatrics,
        Department::GeneralMedicine,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Department::Cardiology => "Cardiology",
            Department::Orthopedics => "Orthopedics",
            Department::Neurology => "Neurology",
            Department::Pediatrics => "Pediatrics",
            Department::GeneralMedicine => "General Medicine",
            Department::Other(value) => value,
        }
    }
}

impl From<String> for Department {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "cardiology" => Department::Cardiology,
            "orthopedics" => Department::Orthopedics,
            "neurology" => Department::Neurology,
            "pediatrics" => Department::Pediatrics,
            "general medicine" => Department::GeneralMedicine,
            _ => Department::Other(value.trim().to_string()),
        }
    }
}

impl From<&str> for Department {
    fn from(value: &str) -> Self {
        Department::from(value.to_string())
    }
}

impl From<Department> for String {
    fn from(value: Department) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission status. Lowercase on the wire (`"admitted"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PatientStatus {
    #[default]
    Admitted,
    Discharged,
    Transferred,
    Other(String),
}

impl PatientStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PatientStatus::Admitted => "admitted",
            PatientStatus::Discharged => "discharged",
            PatientStatus::Transferred => "transferred",
            PatientStatus::Other(value) => value,
        }
    }
}

impl From<String> for PatientStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "" | "admitted" => PatientStatus::Admitted,
            "discharged" => PatientStatus::Discharged,
            "transferred" => PatientStatus::Transferred,
            _ => PatientStatus::Other(value.trim().to_string()),
        }
    }
}

impl From<&str> for PatientStatus {
    fn from(value: &str) -> Self {
        PatientStatus::from(value.to_string())
    }
}

impl From<PatientStatus> for String {
    fn from(value: PatientStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_parsing_is_case_insensitive() {
        assert_eq!(Department::from("cardiology"), Department::Cardiology);
        assert_eq!(
            Department::from("GENERAL MEDICINE"),
            Department::GeneralMedicine
        );
        assert_eq!(
            Department::from("Oncology"),
            Department::Other("Oncology".into())
        );
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&PatientStatus::Discharged).unwrap();
        assert_eq!(json, "\"discharged\"");

        let status: PatientStatus = serde_json::from_str("\"Admitted\"").unwrap();
        assert_eq!(status, PatientStatus::Admitted);

        let status: PatientStatus = serde_json::from_str("\"icu\"").unwrap();
        assert_eq!(status, PatientStatus::Other("icu".into()));
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::from("female").to_string(), "Female");
        assert_eq!(Gender::from("Non-binary").to_string(), "Non-binary");
    }
}
