//! Remote-mode roster: the backend owns the records, the client owns the view.

use std::path::Path;

use patient_roster_core::{
    Department, PageInfo, Patient, PatientForm, SortField, SortOrder, Stats, StatsToggle,
    ViewState,
};

use crate::error::ClientResult;
use crate::query::QueryParams;
use crate::transport::Transport;

/// Page size used when walking the whole collection. The backend caps
/// `per_page` at this value.
pub const STATS_PAGE_SIZE: u32 = 100;

/// Patient roster served by a backend.
///
/// Only the current page is held locally. Its `page`, `total` and
/// `per_page` come from the backend as-is and drive the pager.
pub struct RemoteRoster<T: Transport> {
    transport: T,
    view: ViewState,
    items: Vec<Patient>,
    page_info: PageInfo,
    stats: StatsToggle,
}

impl<T: Transport> RemoteRoster<T> {
    /// A roster with nothing fetched yet; call [`refresh`](Self::refresh)
    /// or [`fetch_page`](Self::fetch_page) to load the first page.
    pub fn new(transport: T, per_page: u32) -> Self {
        Self::with_view(transport, ViewState::new(per_page))
    }

    pub fn with_view(transport: T, view: ViewState) -> Self {
        Self {
            transport,
            page_info: PageInfo::new(0, view.page(), view.per_page()),
            view,
            items: Vec::new(),
            stats: StatsToggle::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Items of the last page fetched.
    pub fn items(&self) -> &[Patient] {
        &self.items
    }

    pub fn page_info(&self) -> &PageInfo {
        &self.page_info
    }

    /// Statistics panel contents, `None` while hidden.
    pub fn visible_stats(&self) -> Option<&Stats> {
        self.stats.current()
    }

    // =========================================================================
    // Listing
    // =========================================================================

    /// Fetch one page under the current criteria.
    ///
    /// Nothing changes unless the request succeeds; on success items, pager
    /// and page number are taken from the response and the stats panel is
    /// hidden.
    pub fn fetch_page(&mut self, page: u32) -> ClientResult<()> {
        let query = QueryParams::from_view(&self.view, page.max(1));
        let response = self.transport.list_patients(&query)?;

        tracing::debug!(
            page = response.page,
            total = response.total,
            items = response.items.len(),
            "fetched patients page"
        );
        self.page_info = PageInfo::from_page(&response);
        self.view.set_page(response.page);
        self.items = response.items;
        self.stats.hide();
        Ok(())
    }

    /// Re-fetch the current page.
    pub fn refresh(&mut self) -> ClientResult<()> {
        self.fetch_page(self.view.page())
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> ClientResult<()> {
        self.view.set_search(search);
        self.fetch_page(1)
    }

    pub fn set_department(&mut self, department: Option<Department>) -> ClientResult<()> {
        self.view.set_department(department);
        self.fetch_page(1)
    }

    pub fn set_sort_by(&mut self, sort_by: SortField) -> ClientResult<()> {
        self.view.set_sort_by(sort_by);
        self.fetch_page(1)
    }

    pub fn set_order(&mut self, order: SortOrder) -> ClientResult<()> {
        self.view.set_order(order);
        self.fetch_page(1)
    }

    /// Fetch the next page. Returns `false` without a request on the last page.
    pub fn next_page(&mut self) -> ClientResult<bool> {
        match self.page_info.next_page() {
            Some(page) => self.fetch_page(page).map(|_| true),
            None => Ok(false),
        }
    }

    /// Fetch the previous page. Returns `false` without a request on page 1.
    pub fn previous_page(&mut self) -> ClientResult<bool> {
        match self.page_info.previous_page() {
            Some(page) => self.fetch_page(page).map(|_| true),
            None => Ok(false),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Validate, then update (form carries an id) or create.
    ///
    /// The current page is re-fetched after the write.
    pub fn save(&mut self, form: &PatientForm) -> ClientResult<Patient> {
        let input = form.validate()?;

        let saved = match form.target_id() {
            Some(id) => self.transport.update_patient(id, &input)?,
            None => self.transport.create_patient(&input)?,
        };
        tracing::info!(id = %saved.id, "saved patient");

        self.refresh()?;
        Ok(saved)
    }

    /// Delete by id. Returns `false`, and leaves the page alone, when the
    /// backend had no such record.
    pub fn delete(&mut self, id: &str) -> ClientResult<bool> {
        if !self.transport.delete_patient(id)? {
            tracing::debug!(id, "no patient to delete");
            return Ok(false);
        }
        tracing::info!(id, "deleted patient");
        self.refresh()?;
        Ok(true)
    }

    pub fn get(&self, id: &str) -> ClientResult<Patient> {
        self.transport.get_patient(id)
    }

    /// Form contents for editing an existing patient.
    pub fn edit_form(&self, id: &str) -> ClientResult<PatientForm> {
        Ok(PatientForm::from(&self.get(id)?))
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Head counts over the whole collection, ignoring the current filters.
    pub fn stats(&self) -> ClientResult<Stats> {
        let patients = fetch_all_pages(&self.transport)?;
        Ok(Stats::from_patients(&patients))
    }

    /// Show or hide the statistics panel, recomputing when shown.
    pub fn toggle_stats(&mut self) -> ClientResult<Option<&Stats>> {
        let transport = &self.transport;
        self.stats.toggle(|| -> ClientResult<Stats> {
            let patients = fetch_all_pages(transport)?;
            Ok(Stats::from_patients(&patients))
        })
    }

    // =========================================================================
    // CSV
    // =========================================================================

    /// Upload CSV content, then re-fetch the current page.
    ///
    /// The backend rejects names not ending in `.csv`.
    pub fn import_csv(&mut self, file_name: &str, contents: Vec<u8>) -> ClientResult<usize> {
        let inserted = self.transport.import_csv(file_name, contents)?;
        tracing::info!(inserted, file_name, "imported CSV");
        self.refresh()?;
        Ok(inserted)
    }

    pub fn import_csv_file(&mut self, path: &Path) -> ClientResult<usize> {
        let contents = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.import_csv(&file_name, contents)
    }

    pub fn export_csv(&self) -> ClientResult<String> {
        self.transport.export_csv()
    }
}

/// Every patient in the backend, gathered page by page without filters.
pub fn fetch_all_pages<T: Transport + ?Sized>(transport: &T) -> ClientResult<Vec<Patient>> {
    let mut patients = Vec::new();
    let mut page = 1;

    loop {
        let response = transport.list_patients(&QueryParams::unfiltered(page, STATS_PAGE_SIZE))?;
        let total = response.total;
        if response.items.is_empty() {
            break;
        }
        patients.extend(response.items);
        if patients.len() >= total {
            break;
        }
        page += 1;
    }

    tracing::debug!(count = patients.len(), pages = page, "collected all patients");
    Ok(patients)
}
