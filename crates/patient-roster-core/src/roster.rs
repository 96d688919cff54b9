//! Local-mode roster: an owned store plus the view over it.

use std::collections::HashSet;

use thiserror::Error;

use crate::db::{Database, DbError};
use crate::export;
use crate::models::{Department, Patient, PatientForm, PatientPage, ValidationError};
use crate::stats::{Stats, StatsToggle};
use crate::view::{self, PageInfo, SortField, SortOrder, ViewState};

/// Local roster errors.
#[derive(Error, Debug)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type RosterResult<T> = Result<T, RosterError>;

/// A CSV line that was not imported.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// Outcome of a bulk CSV import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: Vec<SkippedLine>,
}

/// Patient roster backed by a local database.
///
/// The database owns the canonical record set; every page is re-derived
/// from it, so saves and deletes show up on the next `current_page` call.
pub struct LocalRoster {
    db: Database,
    view: ViewState,
    stats: StatsToggle,
}

impl LocalRoster {
    pub fn new(db: Database) -> Self {
        Self::with_view(db, ViewState::default())
    }

    pub fn with_view(db: Database, view: ViewState) -> Self {
        Self {
            db,
            view,
            stats: StatsToggle::default(),
        }
    }

    /// Roster over a fresh in-memory database.
    pub fn in_memory() -> RosterResult<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// The page the current view selects.
    pub fn current_page(&self) -> RosterResult<PatientPage> {
        let patients = self.db.list_patients()?;
        Ok(view::apply(&patients, &self.view))
    }

    pub fn page_info(&self) -> RosterResult<PageInfo> {
        Ok(PageInfo::from_page(&self.current_page()?))
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.view.set_search(search);
    }

    pub fn set_department(&mut self, department: Option<Department>) {
        self.view.set_department(department);
    }

    pub fn set_sort_by(&mut self, sort_by: SortField) {
        self.view.set_sort_by(sort_by);
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.view.set_order(order);
    }

    /// Jump straight to a page; criteria are untouched and no bounds apply.
    pub fn go_to_page(&mut self, page: u32) {
        self.view.set_page(page);
    }

    /// Advance one page. Returns `false` (and changes nothing) on the last page.
    pub fn next_page(&mut self) -> RosterResult<bool> {
        Ok(match self.page_info()?.next_page() {
            Some(page) => {
                self.view.set_page(page);
                true
            }
            None => false,
        })
    }

    /// Go back one page. Returns `false` (and changes nothing) on page 1.
    pub fn previous_page(&mut self) -> RosterResult<bool> {
        Ok(match self.page_info()?.previous_page() {
            Some(page) => {
                self.view.set_page(page);
                true
            }
            None => false,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create or overwrite a patient from form input.
    ///
    /// A form ID that matches a stored record replaces that record in place;
    /// any other form is stored as a new patient under a freshly minted ID.
    pub fn save(&mut self, form: &PatientForm) -> RosterResult<Patient> {
        let input = form.validate()?;

        if let Some(id) = form.target_id() {
            if let Some(mut existing) = self.db.get_patient(id)? {
                existing.apply(input);
                self.db.update_patient(&existing)?;
                tracing::info!(id = %existing.id, "updated patient");
                return Ok(existing);
            }
            tracing::debug!(id, "no patient with form id, creating a new one");
        }

        let patient = Patient::new(self.mint_id(&HashSet::new())?, input);
        self.db.insert_patient(&patient)?;
        tracing::info!(id = %patient.id, "created patient");
        Ok(patient)
    }

    /// Remove a patient. Unknown IDs are a no-op returning `false`.
    pub fn delete(&mut self, id: &str) -> RosterResult<bool> {
        let removed = self.db.delete_patient(id)?;
        if removed {
            tracing::info!(id, "deleted patient");
        } else {
            tracing::debug!(id, "delete ignored, no such patient");
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> RosterResult<Option<Patient>> {
        Ok(self.db.get_patient(id)?)
    }

    /// Form contents for editing an existing patient.
    pub fn edit_form(&self, id: &str) -> RosterResult<Option<PatientForm>> {
        Ok(self.get(id)?.as_ref().map(PatientForm::from))
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Head counts over every stored patient.
    pub fn stats(&self) -> RosterResult<Stats> {
        let patients = self.db.list_patients()?;
        Ok(Stats::from_patients(&patients))
    }

    /// Show or hide the statistics panel, recomputing when shown.
    pub fn toggle_stats(&mut self) -> RosterResult<Option<&Stats>> {
        let db = &self.db;
        self.stats.toggle(|| -> RosterResult<Stats> {
            let patients = db.list_patients()?;
            Ok(Stats::from_patients(&patients))
        })
    }

    // =========================================================================
    // CSV
    // =========================================================================

    /// Import every valid line of `text`; the batch is applied all at once.
    pub fn import_csv(&mut self, text: &str) -> RosterResult<ImportReport> {
        let mut report = ImportReport::default();
        let mut batch = Vec::new();
        let mut minted = HashSet::new();

        for record in export::parse_csv(text) {
            if record.is_short() {
                tracing::debug!(
                    line = record.line,
                    fields = record.field_count,
                    "short CSV line padded with empty fields"
                );
            }
            match record.form.validate() {
                Ok(input) => {
                    let id = self.mint_id(&minted)?;
                    minted.insert(id.clone());
                    batch.push(Patient::new(id, input));
                }
                Err(e) => {
                    tracing::warn!(line = record.line, error = %e, "skipping CSV line");
                    report.skipped.push(SkippedLine {
                        line: record.line,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.inserted = self.db.insert_patients(&batch)?;
        tracing::info!(
            inserted = report.inserted,
            skipped = report.skipped.len(),
            "imported CSV"
        );
        Ok(report)
    }

    /// Every stored patient as positional CSV, in store order.
    pub fn export_csv(&self) -> RosterResult<String> {
        let patients = self.db.list_patients()?;
        Ok(export::to_csv(&patients))
    }

    /// A UUID not yet used in the store or in `pending`.
    fn mint_id(&self, pending: &HashSet<String>) -> RosterResult<String> {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if !pending.contains(&id) && !self.db.patient_exists(&id)? {
                return Ok(id);
            }
        }
    }
}
