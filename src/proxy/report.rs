//! Partial-failure aggregation for batch deploys.

use std::collections::HashMap;

use crate::error::{ClientError, DeployFailure, DeployFailures};

/// A deploy status is bad unless it is `200 OK` or `202 Accepted`.
pub fn is_bad_status_code(status: u16) -> bool {
    status != 200 && status != 202
}

/// Status code per function name for one batch of deploys.
///
/// Recording the same function twice keeps the latest status. The report is
/// plain owned data; concurrent producers must synchronise around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    results: HashMap<String, u16>,
}

impl DeployReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `function`.
    pub fn record(&mut self, function: impl Into<String>, status: u16) {
        self.results.insert(function.into(), status);
    }

    pub fn status(&self, function: &str) -> Option<u16> {
        self.results.get(function).copied()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Every recorded function with a bad status, sorted by name.
    pub fn failures(&self) -> Vec<DeployFailure> {
        let mut failures: Vec<DeployFailure> = self
            .results
            .iter()
            .filter(|(_, status)| is_bad_status_code(**status))
            .map(|(function, status)| DeployFailure {
                function: function.clone(),
                status: *status,
            })
            .collect();
        failures.sort_by(|a, b| a.function.cmp(&b.function));
        failures
    }

    /// `Ok` when nothing was attempted or every status was good; otherwise
    /// one error naming every failed function.
    pub fn evaluate(&self) -> Result<(), ClientError> {
        let failures = self.failures();
        if failures.is_empty() {
            return Ok(());
        }
        Err(ClientError::PartialDeployFailure(DeployFailures(failures)))
    }
}

impl<S: Into<String>> FromIterator<(S, u16)> for DeployReport {
    fn from_iter<I: IntoIterator<Item = (S, u16)>>(iter: I) -> Self {
        let mut report = Self::new();
        report.extend(iter);
        report
    }
}

impl<S: Into<String>> Extend<(S, u16)> for DeployReport {
    fn extend<I: IntoIterator<Item = (S, u16)>>(&mut self, iter: I) {
        for (function, status) in iter {
            self.record(function, status);
        }
    }
}
