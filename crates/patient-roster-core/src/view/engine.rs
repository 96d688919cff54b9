//! Filter, sort and paginate a resident record set.

use crate::models::{Department, Patient, PatientPage};

use super::{SortField, SortOrder, ViewState};

/// Whether a patient passes the search and department filters.
///
/// `needle` must already be lowercased; an empty needle matches everyone.
pub fn matches(patient: &Patient, needle: &str, department: Option<&Department>) -> bool {
    let text_match = needle.is_empty()
        || patient.name.to_lowercase().contains(needle)
        || patient.phone_or_empty().to_lowercase().contains(needle);

    let department_match = department.map_or(true, |d| &patient.department == d);

    text_match && department_match
}

/// Records retained by the view's search and department filter, in store order.
pub fn filter<'a>(patients: &'a [Patient], view: &ViewState) -> Vec<&'a Patient> {
    let needle = view.search().trim().to_lowercase();
    patients
        .iter()
        .filter(|p| matches(p, &needle, view.department()))
        .collect()
}

/// Sort in place. Ties keep their incoming order.
pub fn sort(records: &mut [&Patient], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| order.apply(field.compare(a, b)));
}

/// The `[(page-1)·per_page, page·per_page)` window of `items`, clamped.
pub fn paginate<T>(items: &[T], page: u32, per_page: u32) -> &[T] {
    let per_page = per_page as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Derive the visible page from the full record set.
pub fn apply(patients: &[Patient], view: &ViewState) -> PatientPage {
    let mut retained = filter(patients, view);
    sort(&mut retained, view.sort_by(), view.order());

    let items = paginate(&retained, view.page(), view.per_page())
        .iter()
        .map(|p| (*p).clone())
        .collect();

    PatientPage {
        items,
        total: retained.len(),
        page: view.page(),
        per_page: view.per_page(),
    }
}
