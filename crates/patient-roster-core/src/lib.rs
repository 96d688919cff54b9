//! Patient Roster Core Library
//!
//! Patient records with a searchable, sortable, paginated list view,
//! department/status head counts, and CSV import/export.
//!
//! # Architecture
//!
//! ```text
//!        Edit form ──validate──► save / delete
//!                                     │
//!                        ┌────────────▼────────────┐
//!                        │   Store (SQLite, owns   │
//!                        │   the full record set)  │
//!                        └────────────┬────────────┘
//!                                     │ every interaction
//!                     ┌───────────────┼───────────────┐
//!                     ▼               ▼               ▼
//!             filter ► sort ►     Stats            CSV
//!               paginate        aggregator      import/export
//!                     │
//!                     ▼
//!             PatientPage + PageInfo ──► host UI
//! ```
//!
//! The same list view can be served by a remote backend instead of the
//! local store; see the `patient-roster-client` crate.
//!
//! # Modules
//!
//! - [`db`]: SQLite store (in-memory by default)
//! - [`models`]: Domain types (Patient, PatientForm, PatientPage, ...)
//! - [`view`]: View state, filter/sort/paginate engine, pagination
//! - [`stats`]: Department and status tallies
//! - [`export`]: Positional CSV codec
//! - [`roster`]: Local-mode controller

pub mod db;
pub mod export;
pub mod models;
pub mod roster;
pub mod stats;
pub mod view;

// Re-export commonly used types
pub use db::Database;
pub use models::{
    Department, Gender, Patient, PatientForm, PatientInput, PatientPage, PatientStatus,
    ValidationError,
};
pub use roster::{ImportReport, LocalRoster, RosterError, RosterResult};
pub use stats::{Stats, StatsToggle, Tally};
pub use view::{PageInfo, SortField, SortOrder, ViewError, ViewState, DEFAULT_PER_PAGE};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientRosterError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<db::DbError> for PatientRosterError {
    fn from(e: db::DbError) -> Self {
        PatientRosterError::DatabaseError(e.to_string())
    }
}

impl From<RosterError> for PatientRosterError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::Validation(e) => PatientRosterError::ValidationError(e.to_string()),
            RosterError::Database(e) => e.into(),
        }
    }
}

impl From<ViewError> for PatientRosterError {
    fn from(e: ViewError) -> Self {
        PatientRosterError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientRosterError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PatientRosterError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a roster database at the given path.
#[uniffi::export]
pub fn open_roster(path: String) -> Result<Arc<PatientRosterCore>, PatientRosterError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(PatientRosterCore {
        roster: Mutex::new(LocalRoster::new(db)),
    }))
}

/// Create a roster over an in-memory database.
#[uniffi::export]
pub fn open_roster_in_memory() -> Result<Arc<PatientRosterCore>, PatientRosterError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(PatientRosterCore {
        roster: Mutex::new(LocalRoster::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe local roster for FFI.
#[derive(uniffi::Object)]
pub struct PatientRosterCore {
    roster: Mutex<LocalRoster>,
}

#[uniffi::export]
impl PatientRosterCore {
    // =========================================================================
    // Record Operations
    // =========================================================================

    /// Create a patient, or overwrite the one whose ID the form carries.
    pub fn save_patient(&self, form: FfiPatientForm) -> Result<FfiPatient, PatientRosterError> {
        let mut roster = self.roster.lock()?;
        let patient = roster.save(&form.into())?;
        Ok(patient.into())
    }

    /// Delete a patient. Returns false if no such patient exists.
    pub fn delete_patient(&self, id: String) -> Result<bool, PatientRosterError> {
        let mut roster = self.roster.lock()?;
        Ok(roster.delete(&id)?)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, PatientRosterError> {
        let roster = self.roster.lock()?;
        Ok(roster.get(&id)?.map(Into::into))
    }

    // =========================================================================
    // List View
    // =========================================================================

    /// The page selected by the current view.
    pub fn current_page(&self) -> Result<FfiPatientPage, PatientRosterError> {
        let roster = self.roster.lock()?;
        let page = roster.current_page()?;
        Ok(page.into())
    }

    /// Set the free-text search. Returns to page 1.
    pub fn set_search(&self, search: String) -> Result<(), PatientRosterError> {
        self.roster.lock()?.set_search(search);
        Ok(())
    }

    /// Restrict to one department, or clear with `None`. Returns to page 1.
    pub fn set_department(&self, department: Option<String>) -> Result<(), PatientRosterError> {
        let department = department
            .filter(|d| !d.trim().is_empty())
            .map(Department::from);
        self.roster.lock()?.set_department(department);
        Ok(())
    }

    /// Sort by a named field (`name`, `age`, ...). Returns to page 1.
    pub fn set_sort_by(&self, sort_by: String) -> Result<(), PatientRosterError> {
        let field: SortField = sort_by.parse()?;
        self.roster.lock()?.set_sort_by(field);
        Ok(())
    }

    /// Sort direction, `asc` or `desc`. Returns to page 1.
    pub fn set_order(&self, order: String) -> Result<(), PatientRosterError> {
        let order: SortOrder = order.parse()?;
        self.roster.lock()?.set_order(order);
        Ok(())
    }

    /// Advance one page; false when already on the last page.
    pub fn next_page(&self) -> Result<bool, PatientRosterError> {
        Ok(self.roster.lock()?.next_page()?)
    }

    /// Go back one page; false when already on page 1.
    pub fn previous_page(&self) -> Result<bool, PatientRosterError> {
        Ok(self.roster.lock()?.previous_page()?)
    }

    // =========================================================================
    // Statistics and CSV
    // =========================================================================

    /// Department and status head counts.
    pub fn stats(&self) -> Result<FfiStats, PatientRosterError> {
        let roster = self.roster.lock()?;
        Ok(roster.stats()?.into())
    }

    /// Import positional CSV text.
    pub fn import_csv(&self, text: String) -> Result<FfiImportReport, PatientRosterError> {
        let mut roster = self.roster.lock()?;
        Ok(roster.import_csv(&text)?.into())
    }

    /// Export all patients as positional CSV text.
    pub fn export_csv(&self) -> Result<String, PatientRosterError> {
        let roster = self.roster.lock()?;
        Ok(roster.export_csv()?)
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub department: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub admission_date: String,
    pub status: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender.into(),
            department: patient.department.into(),
            phone: patient.phone,
            address: patient.address,
            notes: patient.notes,
            admission_date: patient.admission_date,
            status: patient.status.into(),
        }
    }
}

/// FFI-safe edit form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientForm {
    pub id: Option<String>,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub department: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
    pub status: Option<String>,
}

impl From<FfiPatientForm> for PatientForm {
    fn from(form: FfiPatientForm) -> Self {
        PatientForm {
            id: form.id,
            name: form.name,
            age: form.age,
            gender: form.gender,
            department: form.department,
            phone: form.phone,
            address: form.address,
            notes: form.notes,
            status: form.status,
        }
    }
}

/// FFI-safe page with pager state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientPage {
    pub items: Vec<FfiPatient>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub summary: String,
}

impl From<PatientPage> for FfiPatientPage {
    fn from(page: PatientPage) -> Self {
        let info = PageInfo::from_page(&page);
        Self {
            items: page.items.into_iter().map(Into::into).collect(),
            total: info.total as u64,
            page: info.page,
            per_page: info.per_page,
            total_pages: info.total_pages,
            has_previous: info.has_previous(),
            has_next: info.has_next(),
            summary: info.summary(),
        }
    }
}

/// FFI-safe tally entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCount {
    pub key: String,
    pub count: u64,
}

/// FFI-safe statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStats {
    pub by_department: Vec<FfiCount>,
    pub by_status: Vec<FfiCount>,
}

impl From<Stats> for FfiStats {
    fn from(stats: Stats) -> Self {
        let counts = |tally: &Tally| -> Vec<FfiCount> {
            tally
                .entries()
                .iter()
                .map(|(key, count)| FfiCount {
                    key: key.clone(),
                    count: *count as u64,
                })
                .collect()
        };
        Self {
            by_department: counts(&stats.by_department),
            by_status: counts(&stats.by_status),
        }
    }
}

/// FFI-safe import outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportReport {
    pub inserted: u64,
    pub skipped_lines: Vec<u64>,
}

impl From<ImportReport> for FfiImportReport {
    fn from(report: ImportReport) -> Self {
        Self {
            inserted: report.inserted as u64,
            skipped_lines: report.skipped.iter().map(|s| s.line as u64).collect(),
        }
    }
}
