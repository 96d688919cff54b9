//! Patient database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbResult};
use crate::models::{Department, Gender, Patient, PatientStatus};

const PATIENT_COLUMNS: &str = "id, name, age, gender, department, phone, address, notes, \
                               admission_date, status";

fn row_to_patient(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: Gender::from(row.get::<_, String>(3)?),
        department: Department::from(row.get::<_, String>(4)?),
        phone: row.get(5)?,
        address: row.get(6)?,
        notes: row.get(7)?,
        admission_date: row.get(8)?,
        status: PatientStatus::from(row.get::<_, String>(9)?),
    })
}

fn insert_row(conn: &Connection, patient: &Patient) -> DbResult<()> {
    conn.execute(
        r#"
        INSERT INTO patients (
            id, name, age, gender, department, phone,
            address, notes, admission_date, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
        params![
            patient.id,
            patient.name,
            patient.age,
            patient.gender.as_str(),
            patient.department.as_str(),
            patient.phone,
            patient.address,
            patient.notes,
            patient.admission_date,
            patient.status.as_str(),
        ],
    )?;
    Ok(())
}

impl Database {
    /// Insert a new patient.
    pub fn insert_patient(&self, patient: &Patient) -> DbResult<()> {
        insert_row(&self.conn, patient)
    }

    /// Insert a batch of patients atomically.
    pub fn insert_patients(&mut self, patients: &[Patient]) -> DbResult<usize> {
        let tx = self.transaction()?;
        for patient in patients {
            insert_row(&tx, patient)?;
        }
        tx.commit()?;
        Ok(patients.len())
    }

    /// Overwrite an existing patient in place. `admission_date` is never changed.
    pub fn update_patient(&self, patient: &Patient) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            UPDATE patients SET
                name = ?2,
                age = ?3,
                gender = ?4,
                department = ?5,
                phone = ?6,
                address = ?7,
                notes = ?8,
                status = ?9
            WHERE id = ?1
            "#,
            params![
                patient.id,
                patient.name,
                patient.age,
                patient.gender.as_str(),
                patient.department.as_str(),
                patient.phone,
                patient.address,
                patient.notes,
                patient.status.as_str(),
            ],
        )?;
        Ok(rows_affected > 0)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"),
                [id],
                row_to_patient,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Check whether an ID is taken.
    pub fn patient_exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT 1 FROM patients WHERE id = ?", [id], |row| row.get(0))
            .optional()?;
        Ok(found.is_some())
    }

    /// List all patients in insertion order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients ORDER BY rowid"))?;

        let rows = stmt.query_map([], row_to_patient)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Number of stored patients.
    pub fn count_patients(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM patients", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Delete a patient.
    pub fn delete_patient(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}
