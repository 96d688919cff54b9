//! List-view state and the derivation of a visible page from it.
//!
//! ```text
//! ViewState ──┐
//!             ├─► filter ─► sort ─► paginate ─► PatientPage ─► PageInfo
//! records  ───┘
//! ```
//!
//! Changing search, department or sort criteria resets the view to page 1.
//! Moving between pages leaves the criteria alone.

mod engine;
mod pagination;

pub use engine::*;
pub use pagination::*;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Department, Patient};

/// Fixed number of records per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// View errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Unknown sort order: {0} (expected asc or desc)")]
    UnknownSortOrder(String),
}

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Age,
    Gender,
    Department,
    AdmissionDate,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::Age,
        SortField::Gender,
        SortField::Department,
        SortField::AdmissionDate,
        SortField::Status,
    ];

    /// Wire name, as used in `sort_by=`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Age => "age",
            SortField::Gender => "gender",
            SortField::Department => "department",
            SortField::AdmissionDate => "admission_date",
            SortField::Status => "status",
        }
    }

    /// Three-way comparison of two patients on this field.
    pub fn compare(self, a: &Patient, b: &Patient) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Age => a.age.cmp(&b.age),
            SortField::Gender => a.gender.as_str().cmp(b.gender.as_str()),
            SortField::Department => a.department.as_str().cmp(b.department.as_str()),
            // ISO-8601 text orders chronologically
            SortField::AdmissionDate => a.admission_date.cmp(&b.admission_date),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

impl FromStr for SortField {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| ViewError::UnknownSortField(s.to_string()))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ViewError::UnknownSortOrder(s.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search, filter, sort and page selections driving the current listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    search: String,
    department: Option<Department>,
    sort_by: SortField,
    order: SortOrder,
    page: u32,
    per_page: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl ViewState {
    /// Newest admissions first, page 1.
    pub fn new(per_page: u32) -> Self {
        Self {
            search: String::new(),
            department: None,
            sort_by: SortField::AdmissionDate,
            order: SortOrder::Desc,
            page: 1,
            per_page,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn department(&self) -> Option<&Department> {
        self.department.as_ref()
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_department(&mut self, department: Option<Department>) {
        self.department = department;
        self.page = 1;
    }

    pub fn set_sort_by(&mut self, sort_by: SortField) {
        self.sort_by = sort_by;
        self.page = 1;
    }

    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
        self.page = 1;
    }

    /// Jump to a page without touching the criteria. Page 0 means page 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }
}
