use std::fmt;
use std::process::ExitCode;

use thanos_check::Failure;

/// Outcome of one run, per suite (a component name or `aws`).
#[derive(Debug, Default)]
pub(crate) struct Report {
    passed: Vec<String>,
    failures: Vec<(String, Failure)>,
    errors: Vec<(String, String)>,
}

impl Report {
    pub(crate) fn record(&mut self, suite: &str, failures: Vec<Failure>) {
        if failures.is_empty() {
            tracing::info!(suite, "Checks passed");
            self.passed.push(suite.to_string());
        }
        for failure in failures {
            tracing::error!(suite, %failure, "Check failed");
            self.failures.push((suite.to_string(), failure));
        }
    }

    /// The suite could not be checked at all.
    pub(crate) fn error(&mut self, suite: &str, err: &impl fmt::Display) {
        tracing::error!(suite, %err, "Check aborted");
        self.errors.push((suite.to_string(), err.to_string()));
    }

    pub(crate) fn is_success(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    pub(crate) fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for suite in &self.passed {
            writeln!(f, "PASS  {suite}")?;
        }
        for (suite, failure) in &self.failures {
            writeln!(f, "FAIL  {suite}: {failure}")?;
        }
        for (suite, err) in &self.errors {
            writeln!(f, "ERROR {suite}: {err}")?;
        }
        write!(
            f,
            "{} passed, {} failed, {} aborted",
            self.passed.len(),
            self.failures.len(),
            self.errors.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_succeeds() {
        let report = Report::default();
        assert!(report.is_success());
        assert_eq!(report.to_string(), "0 passed, 0 failed, 0 aborted");
    }

    #[test]
    fn failures_and_errors_fail_the_run() {
        let mut report = Report::default();
        report.record("compactor", Vec::new());
        report.record(
            "storegateway",
            vec![Failure::Restarted {
                pod: "thanos-storegateway-0".to_string(),
                container: "storegateway".to_string(),
                count: 3,
            }],
        );
        assert!(!report.is_success());

        report.error("aws", &"s3:HeadBucket failed: access denied");
        let summary = report.to_string();
        assert!(summary.contains("PASS  compactor"));
        assert!(summary.contains("FAIL  storegateway: pod thanos-storegateway-0"));
        assert!(summary.contains("ERROR aws: s3:HeadBucket failed"));
        assert!(summary.ends_with("1 passed, 1 failed, 1 aborted"));
    }
}
