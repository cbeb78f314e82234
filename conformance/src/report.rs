//! Conformance report types: results, severity levels, and report aggregation.

use serde::Serialize;

/// Severity level of a conformance check result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// The check found something worth characterising (non-blocking).
    Warning,
    /// The check failed (the tables must not be deployed).
    Failure,
}

impl Severity {
    /// Fixed-width label used in text reports.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single conformance check result.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Validator that produced this result, e.g. `tables/range`.
    pub validator: String,
    /// Human-readable outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Offending addresses, phases or lines, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    fn new(validator: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            validator: validator.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// Creates a passing result.
    pub fn pass(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Pass)
    }

    /// Creates a warning result.
    pub fn warn(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Warning)
    }

    /// Creates a failure result.
    pub fn fail(validator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(validator, message, Severity::Failure)
    }

    /// Attaches detail lines, keeping at most `MAX_DETAILS` of them.
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        let total = details.len();
        self.details = details.into_iter().take(MAX_DETAILS).collect();
        if total > MAX_DETAILS {
            self.details
                .push(format!("... and {} more", total - MAX_DETAILS));
        }
        self
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Detail lines kept per result; long lists are elided.
pub const MAX_DETAILS: usize = 8;

/// Pass/warn/fail tallies of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Passed checks.
    pub passed: usize,
    /// Warnings.
    pub warned: usize,
    /// Failed checks.
    pub failed: usize,
}

/// Aggregated conformance report from all validators.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// All individual results across all validators.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Pushes a pass if `ok`, otherwise a failure carrying `details`.
    pub fn check(
        &mut self,
        validator: &str,
        ok: bool,
        pass_message: impl Into<String>,
        fail_message: impl Into<String>,
        details: Vec<String>,
    ) {
        if ok {
            self.push(TestResult::pass(validator, pass_message));
        } else {
            self.push(TestResult::fail(validator, fail_message).with_details(details));
        }
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Counts results by severity.
    pub fn tally(&self) -> Tally {
        self.results
            .iter()
            .fold(Tally::default(), |mut t, r| {
                match r.severity {
                    Severity::Pass => t.passed += 1,
                    Severity::Warning => t.warned += 1,
                    Severity::Failure => t.failed += 1,
                }
                t
            })
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.tally().failed
    }

    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Results produced by validators whose name starts with `prefix`.
    pub fn by_validator<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a TestResult> {
        self.results
            .iter()
            .filter(move |r| r.validator.starts_with(prefix))
    }
}
