//! Department and status head counts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Patient;

/// Frequency count keyed by text, in first-encountered key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    entries: Vec<(String, usize)>,
}

impl Tally {
    pub fn add(&mut self, key: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key.to_string(), 1)),
        }
    }

    /// Count for `key`, zero if never seen.
    pub fn get(&self, key: &str) -> usize {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, count)| *count)
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

impl<'a> FromIterator<&'a str> for Tally {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Tally::default();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

/// Head counts over a full record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub by_department: Tally,
    pub by_status: Tally,
}

impl Stats {
    pub fn from_patients<'a, I>(patients: I) -> Self
    where
        I: IntoIterator<Item = &'a Patient>,
    {
        let mut stats = Stats::default();
        for patient in patients {
            stats.by_department.add(patient.department.as_str());
            stats.by_status.add(patient.status.as_str());
        }
        stats
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (heading, tally) in [
            ("Patients by Department", &self.by_department),
            ("Patients by Status", &self.by_status),
        ] {
            writeln!(f, "{heading}")?;
            if tally.is_empty() {
                writeln!(f, "  No data")?;
            }
            for (key, count) in tally.entries() {
                writeln!(f, "  {key}: {count}")?;
            }
        }
        Ok(())
    }
}

/// Show/hide state of a statistics panel.
///
/// Every switch to visible recomputes; nothing is cached across toggles.
#[derive(Debug, Default)]
pub struct StatsToggle {
    shown: Option<Stats>,
}

impl StatsToggle {
    /// The stats on display, `None` while hidden.
    pub fn current(&self) -> Option<&Stats> {
        self.shown.as_ref()
    }

    pub fn hide(&mut self) {
        self.shown = None;
    }

    /// Flip visibility. `compute` only runs when the panel is being shown.
    pub fn toggle<E>(
        &mut self,
        compute: impl FnOnce() -> Result<Stats, E>,
    ) -> Result<Option<&Stats>, E> {
        if self.shown.take().is_none() {
            self.shown = Some(compute()?);
        }
        Ok(self.shown.as_ref())
    }
}
