//! Aggregated validation findings.
//!
//! Checks record every violated invariant instead of stopping at the first
//! one, so a single pass over an object graph yields the complete picture.
//! Callers that only need pass/fail convert the report into a `Result` whose
//! error message lists all findings.

use anyhow::{Result, bail};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
/// One violated invariant: which field broke the rule and how.
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Default)]
/// Collector for violations found while walking one object graph.
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against the named field.
    pub fn record(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.into(),
            message: message.into(),
        });
    }

    /// True when no violation has been recorded.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// All recorded violations in discovery order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Convert into a pass/fail outcome.
    ///
    /// On failure the error message names the subject and lists every
    /// violation on its own line, so test output shows the full set at once.
    pub fn into_result(self, subject: &str) -> Result<()> {
        if self.violations.is_empty() {
            return Ok(());
        }
        let details = self
            .violations
            .iter()
            .map(Violation::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        bail!(
            "{subject} violated {} invariant(s):\n{details}",
            self.violations.len()
        );
    }
}
