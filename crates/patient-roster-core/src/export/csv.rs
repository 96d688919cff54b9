//! Positional CSV codec for bulk import and export.
//!
//! Layout: `name,age,gender,department,phone,notes`, one record per line,
//! no header row. Fields are neither quoted nor escaped, so a comma or line
//! break inside a value does not survive a round trip.

use crate::models::{Patient, PatientForm};

/// Number of positional fields per line.
pub const CSV_FIELDS: usize = 6;

/// A parsed line, still unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRecord {
    /// 1-based line number in the source text
    pub line: usize,
    /// Field count found on the line
    pub field_count: usize,
    pub form: PatientForm,
}

impl CsvRecord {
    /// Lines with fewer than six fields are padded with empty values.
    pub fn is_short(&self) -> bool {
        self.field_count < CSV_FIELDS
    }
}

/// Serialize one patient as a CSV line (without the line break).
pub fn to_csv_line(patient: &Patient) -> String {
    let age = patient.age.to_string();
    [
        patient.name.as_str(),
        age.as_str(),
        patient.gender.as_str(),
        patient.department.as_str(),
        patient.phone.as_deref().unwrap_or(""),
        patient.notes.as_deref().unwrap_or(""),
    ]
    .join(",")
}

/// Serialize patients, one line each, in the given order.
pub fn to_csv<'a, I>(patients: I) -> String
where
    I: IntoIterator<Item = &'a Patient>,
{
    let mut csv = String::new();
    for patient in patients {
        csv.push_str(&to_csv_line(patient));
        csv.push('\n');
    }
    csv
}

/// Split CSV text into form payloads. Blank lines are skipped; extra fields
/// past the sixth are ignored.
pub fn parse_csv(text: &str) -> Vec<CsvRecord> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let fields: Vec<&str> = line.trim_end_matches('\r').split(',').collect();
            let field = |i: usize| fields.get(i).map(|f| f.trim().to_string()).unwrap_or_default();

            CsvRecord {
                line: index + 1,
                field_count: fields.len(),
                form: PatientForm {
                    id: None,
                    name: field(0),
                    age: field(1),
                    gender: field(2),
                    department: field(3),
                    phone: field(4),
                    address: String::new(),
                    notes: field(5),
                    status: None,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Department, Gender, PatientInput};

    fn make_patient(name: &str, phone: Option<&str>, notes: Option<&str>) -> Patient {
        Patient::new(
            "id".into(),
            PatientInput {
                name: name.into(),
                age: 52,
                gender: Gender::Male,
                department: Department::GeneralMedicine,
                phone: phone.map(Into::into),
                address: Some("1 Main St".into()),
                notes: notes.map(Into::into),
                status: None,
            },
        )
    }

    #[test]
    fn test_export_line_layout() {
        let patient = make_patient("John Doe", Some("555-0199"), Some("Post-op"));
        assert_eq!(
            to_csv_line(&patient),
            "John Doe,52,Male,General Medicine,555-0199,Post-op"
        );

        let bare = make_patient("Jane", None, None);
        assert_eq!(to_csv_line(&bare), "Jane,52,Male,General Medicine,,");
    }

    #[test]
    fn test_export_has_no_header() {
        let patients = vec![make_patient("A", None, None), make_patient("B", None, None)];
        let csv = to_csv(&patients);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("A,"));
    }

    #[test]
    fn test_parse_full_line() {
        let records = parse_csv("Jane Smith,45,Female,Cardiology,555-0101,Stable\r\n");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.line, 1);
        assert!(!record.is_short());
        assert_eq!(record.form.name, "Jane Smith");
        assert_eq!(record.form.age, "45");
        assert_eq!(record.form.notes, "Stable");
    }

    #[test]
    fn test_parse_short_and_blank_lines() {
        let text = "Jane,45,Female,Cardiology\n\n   \nJohn,32\n";
        let records = parse_csv(text);
        assert_eq!(records.len(), 2);

        assert!(records[0].is_short());
        assert_eq!(records[0].form.department, "Cardiology");
        assert_eq!(records[0].form.phone, "");

        assert_eq!(records[1].line, 4);
        assert_eq!(records[1].form.gender, "");
    }

    #[test]
    fn test_embedded_comma_is_lost() {
        let patient = make_patient("Doe, John", None, None);
        let records = parse_csv(&to_csv_line(&patient));
        assert_eq!(records[0].form.name, "Doe");
        assert_eq!(records[0].form.age, "John");
    }
}
