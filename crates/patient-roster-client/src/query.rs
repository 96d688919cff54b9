//! Query-string parameters for `GET /patients`.

use patient_roster_core::ViewState;
use reqwest::Url;

/// Ordered query parameters with empty values already dropped.
///
/// The backend reads a missing parameter as "no constraint", which is not
/// the same as an empty one, so empties never reach the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter unless its value is empty.
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key, value));
        }
        self
    }

    /// Add an optional parameter; `None` is omitted.
    pub fn with_opt(self, key: &'static str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    /// Parameters for one page of the given view.
    pub fn from_view(view: &ViewState, page: u32) -> Self {
        Self::new()
            .with("page", page)
            .with("per_page", view.per_page())
            .with("search", view.search().trim())
            .with_opt("department", view.department())
            .with("sort_by", view.sort_by())
            .with("order", view.order())
    }

    /// Unfiltered page of the whole collection.
    pub fn unfiltered(page: u32, per_page: u32) -> Self {
        Self::new().with("page", page).with("per_page", per_page)
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Append the parameters to `url`, form-urlencoding each value.
    pub fn apply(&self, url: &mut Url) {
        if self.is_empty() {
            return;
        }
        let mut query = url.query_pairs_mut();
        for (key, value) in &self.pairs {
            query.append_pair(key, value);
        }
    }
}
