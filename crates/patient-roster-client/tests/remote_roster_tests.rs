//! Remote roster tests against an in-process fake backend.

use std::cell::{Cell, RefCell};

use patient_roster_client::{
    ClientError, ClientResult, QueryParams, RemoteRoster, Transport, STATS_PAGE_SIZE,
};
use patient_roster_core::{
    view, Department, Patient, PatientForm, PatientInput, PatientPage, SortField, SortOrder,
    ValidationError, ViewState,
};

/// Backend double: filters, sorts and pages with the local engine and
/// records every list query it receives.
#[derive(Default)]
struct FakeBackend {
    patients: RefCell<Vec<Patient>>,
    queries: RefCell<Vec<QueryParams>>,
    next_id: Cell<u32>,
    fail_lists: Cell<bool>,
}

impl FakeBackend {
    fn seeded(count: u32) -> Self {
        let backend = Self::default();
        for i in 0..count {
            let input = input(&format!("Patient {i}"), 20 + i, "Cardiology");
            backend.create_patient(&input).unwrap();
        }
        backend
    }

    fn list_count(&self) -> usize {
        self.queries.borrow().len()
    }

    fn last_query(&self) -> QueryParams {
        self.queries.borrow().last().cloned().unwrap()
    }
}

fn input(name: &str, age: u32, department: &str) -> PatientInput {
    PatientForm {
        name: name.into(),
        age: age.to_string(),
        gender: "Female".into(),
        department: department.into(),
        ..Default::default()
    }
    .validate()
    .unwrap()
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "Not found".into(),
    }
}

impl Transport for FakeBackend {
    fn list_patients(&self, query: &QueryParams) -> ClientResult<PatientPage> {
        self.queries.borrow_mut().push(query.clone());
        if self.fail_lists.get() {
            return Err(ClientError::Api {
                status: 500,
                message: "Error fetching patients: Internal Server Error".into(),
            });
        }

        let per_page: u32 = query
            .get("per_page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(10)
            .min(STATS_PAGE_SIZE);
        let mut state = ViewState::new(per_page);
        state.set_search(query.get("search").unwrap_or(""));
        state.set_department(query.get("department").map(Department::from));
        if let Some(field) = query.get("sort_by") {
            state.set_sort_by(field.parse()?);
        }
        if let Some(order) = query.get("order") {
            state.set_order(order.parse()?);
        }
        state.set_page(query.get("page").and_then(|v| v.parse().ok()).unwrap_or(1));

        Ok(view::apply(&self.patients.borrow(), &state))
    }

    fn get_patient(&self, id: &str) -> ClientResult<Patient> {
        self.patients
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    fn create_patient(&self, input: &PatientInput) -> ClientResult<Patient> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let patient = Patient::new(format!("{id:024x}"), input.clone());
        self.patients.borrow_mut().push(patient.clone());
        Ok(patient)
    }

    fn update_patient(&self, id: &str, input: &PatientInput) -> ClientResult<Patient> {
        let mut patients = self.patients.borrow_mut();
        let patient = patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(not_found)?;
        patient.apply(input.clone());
        Ok(patient.clone())
    }

    fn delete_patient(&self, id: &str) -> ClientResult<bool> {
        let mut patients = self.patients.borrow_mut();
        let before = patients.len();
        patients.retain(|p| p.id != id);
        Ok(patients.len() < before)
    }

    fn import_csv(&self, file_name: &str, _contents: Vec<u8>) -> ClientResult<usize> {
        if !file_name.ends_with(".csv") {
            return Err(ClientError::Api {
                status: 400,
                message: "Invalid CSV file".into(),
            });
        }
        Ok(0)
    }

    fn export_csv(&self) -> ClientResult<String> {
        Ok(String::new())
    }
}

fn roster(count: u32, per_page: u32) -> RemoteRoster<FakeBackend> {
    let mut roster = RemoteRoster::new(FakeBackend::seeded(count), per_page);
    roster.fetch_page(1).unwrap();
    roster
}

#[test]
fn test_first_fetch_omits_empty_parameters() {
    let roster = roster(3, 10);
    let query = roster.transport().last_query();

    assert_eq!(query.get("search"), None);
    assert_eq!(query.get("department"), None);
    assert_eq!(query.get("sort_by"), Some("admission_date"));
    assert_eq!(query.get("order"), Some("desc"));
    assert_eq!(roster.items().len(), 3);
    assert_eq!(roster.page_info().total, 3);
}

#[test]
fn test_pager_follows_backend_response() {
    let mut roster = roster(5, 2);
    assert_eq!(roster.page_info().total_pages, 3);

    assert!(roster.next_page().unwrap());
    assert!(roster.next_page().unwrap());
    assert_eq!(roster.view().page(), 3);
    assert_eq!(roster.items().len(), 1);
    assert_eq!(roster.page_info().summary(), "Page 3 of 3 (5 patients)");
}

#[test]
fn test_navigation_past_bounds_sends_nothing() {
    let mut roster = roster(3, 2);
    let before = roster.transport().list_count();

    assert!(!roster.previous_page().unwrap());
    assert_eq!(roster.transport().list_count(), before);

    assert!(roster.next_page().unwrap());
    assert!(!roster.next_page().unwrap());
    assert_eq!(roster.transport().list_count(), before + 1);
    assert_eq!(roster.view().page(), 2);
}

#[test]
fn test_criteria_change_goes_back_to_page_one() {
    let mut roster = roster(5, 2);
    roster.next_page().unwrap();
    roster.next_page().unwrap();

    roster.set_search("patient 1").unwrap();
    let query = roster.transport().last_query();
    assert_eq!(query.get("page"), Some("1"));
    assert_eq!(query.get("search"), Some("patient 1"));
    assert_eq!(roster.view().page(), 1);
    assert_eq!(roster.page_info().total, 1);

    roster.set_sort_by(SortField::Age).unwrap();
    roster.set_order(SortOrder::Asc).unwrap();
    let query = roster.transport().last_query();
    assert_eq!(query.get("sort_by"), Some("age"));
    assert_eq!(query.get("order"), Some("asc"));
}

#[test]
fn test_department_filter_is_sent() {
    let mut roster = roster(2, 10);
    roster
        .save(&PatientForm {
            name: "Ahmed Khan".into(),
            age: "28".into(),
            gender: "Male".into(),
            department: "General Medicine".into(),
            ..Default::default()
        })
        .unwrap();

    roster
        .set_department(Some(Department::GeneralMedicine))
        .unwrap();
    assert_eq!(
        roster.transport().last_query().get("department"),
        Some("General Medicine")
    );
    assert_eq!(roster.items().len(), 1);
    assert_eq!(roster.items()[0].name, "Ahmed Khan");
}

#[test]
fn test_save_creates_then_updates() {
    let mut roster = roster(0, 10);
    let created = roster
        .save(&PatientForm {
            name: "Jane Smith".into(),
            age: "45".into(),
            gender: "Female".into(),
            department: "Cardiology".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(roster.page_info().total, 1);

    let mut edit = roster.edit_form(&created.id).unwrap();
    edit.age = "46".into();
    let updated = roster.save(&edit).unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(roster.page_info().total, 1);
    assert_eq!(roster.items()[0].age, 46);
}

#[test]
fn test_invalid_form_sends_nothing() {
    let mut roster = roster(1, 10);
    let before = roster.transport().list_count();

    let err = roster
        .save(&PatientForm {
            name: "Jane".into(),
            age: "0".into(),
            gender: "Female".into(),
            department: "Cardiology".into(),
            ..Default::default()
        })
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Validation(ValidationError::InvalidAge(_))
    ));
    assert_eq!(roster.transport().list_count(), before);
    assert_eq!(roster.transport().patients.borrow().len(), 1);
}

#[test]
fn test_update_of_missing_patient_surfaces_backend_message() {
    let mut roster = roster(1, 10);
    let err = roster
        .save(&PatientForm {
            id: Some("ffffffffffffffffffffffff".into()),
            name: "Jane".into(),
            age: "40".into(),
            gender: "Female".into(),
            department: "Cardiology".into(),
            ..Default::default()
        })
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found");
}

#[test]
fn test_delete_refetches_current_page() {
    let mut roster = roster(3, 10);
    let id = roster.items()[0].id.clone();

    assert!(roster.delete(&id).unwrap());
    assert_eq!(roster.page_info().total, 2);
    assert!(roster.items().iter().all(|p| p.id != id));
}

#[test]
fn test_delete_of_missing_patient_reports_nothing_deleted() {
    let mut roster = roster(2, 10);
    let before = roster.transport().list_count();

    assert!(!roster.delete("ffffffffffffffffffffffff").unwrap());
    assert_eq!(roster.transport().list_count(), before);
    assert_eq!(roster.page_info().total, 2);
}

#[test]
fn test_failed_fetch_keeps_previous_state() {
    let mut roster = roster(5, 2);
    let items = roster.items().to_vec();
    let info = *roster.page_info();

    roster.transport().fail_lists.set(true);
    let err = roster.next_page().unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error fetching patients: Internal Server Error"
    );

    assert_eq!(roster.items(), items.as_slice());
    assert_eq!(*roster.page_info(), info);
    assert_eq!(roster.view().page(), 1);
}

#[test]
fn test_stats_walk_every_page() {
    let mut roster = roster(250, 10);
    roster.set_search("Patient 1").unwrap();

    let before = roster.transport().list_count();
    let stats = roster.toggle_stats().unwrap().cloned().unwrap();

    // Filters are ignored and the collection is read 100 at a time
    assert_eq!(stats.by_department.get("Cardiology"), 250);
    assert_eq!(stats.by_status.get("admitted"), 250);
    assert_eq!(roster.transport().list_count(), before + 3);
    let query = roster.transport().last_query();
    assert_eq!(query.get("per_page"), Some("100"));
    assert_eq!(query.get("search"), None);

    assert!(roster.toggle_stats().unwrap().is_none());
}

#[test]
fn test_page_fetch_hides_stats() {
    let mut roster = roster(3, 2);
    roster.toggle_stats().unwrap();
    assert!(roster.visible_stats().is_some());

    roster.next_page().unwrap();
    assert!(roster.visible_stats().is_none());
}

#[test]
fn test_import_rejects_non_csv_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patients.txt");
    std::fs::write(&path, "Jane,45,Female,Cardiology,,\n").unwrap();

    let mut roster = roster(0, 10);
    let err = roster.import_csv_file(&path).unwrap_err();
    assert_eq!(err.to_string(), "Invalid CSV file");

    let csv = dir.path().join("patients.csv");
    std::fs::write(&csv, "Jane,45,Female,Cardiology,,\n").unwrap();
    assert_eq!(roster.import_csv_file(&csv).unwrap(), 0);
}

#[test]
fn test_import_refetches_current_page() {
    let mut roster = roster(5, 2);
    roster.next_page().unwrap();
    let before = roster.transport().list_count();

    roster.import_csv("patients.csv", Vec::new()).unwrap();
    assert_eq!(roster.transport().list_count(), before + 1);
    assert_eq!(roster.transport().last_query().get("page"), Some("2"));
    assert_eq!(roster.view().page(), 2);
}
