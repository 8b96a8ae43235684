//! Checks are named boolean assertions.
//!
//! A failed check never stops anything: it is only counted, and the counts end up in the
//! final report. A [`CheckSet`] is the [`Aggregate`] of [`Check`] samples and keeps its
//! entries in the order their names were first recorded.
use crate::{
    Aggregate,
    macros::{aggregate, metric},
};

/// One evaluation of a named check.
#[metric]
pub struct Check {
    pub name: String,
    pub passed: bool,
}

impl Check {
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
        }
    }
}

/// Pass/fail counters of a single named check.
#[aggregate]
pub struct CheckEntry {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

impl CheckEntry {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }
}

#[aggregate]
#[derive(Default)]
pub struct CheckSet {
    entries: Vec<CheckEntry>,
}

impl CheckSet {
    /// Record the outcome of `name` and hand `passed` back, so the call can be used
    /// inline in a condition.
    pub fn record(&mut self, name: &str, passed: bool) -> bool {
        self.add(name, u64::from(passed), u64::from(!passed));
        if !passed {
            tracing::debug!("check failed: {name}");
        }
        passed
    }

    fn add(&mut self, name: &str, passes: u64, fails: u64) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.passes += passes;
                entry.fails += fails;
            }
            None => self.entries.push(CheckEntry {
                name: name.to_owned(),
                passes,
                fails,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CheckEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CheckEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn passes(&self) -> u64 {
        self.entries.iter().map(|e| e.passes).sum()
    }

    pub fn fails(&self) -> u64 {
        self.entries.iter().map(|e| e.fails).sum()
    }
}

impl Aggregate for CheckSet {
    type Metric = Check;

    fn new() -> Self {
        Self::default()
    }

    fn consume(&mut self, metric: &Self::Metric) {
        self.record(&metric.name, metric.passed);
    }

    fn merge(&mut self, other: Self) {
        for entry in other.entries {
            self.add(&entry.name, entry.passes, entry.fails);
        }
    }
}
