//! One page of a patient listing.

use serde::{Deserialize, Serialize};

use super::Patient;

/// A page of patients plus the size of the full filtered set.
///
/// This is both the body of `GET /patients` and what the local engine
/// derives from the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientPage {
    pub items: Vec<Patient>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
}

impl PatientPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
