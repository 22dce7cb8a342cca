use std::time::Duration;

use super::*;

/// A functional check failure: the deployment is observably not in the expected state.
///
/// Every variant names the resource it is about so that a report line on its own
/// is enough to find the offending object.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("pods with label {selector} in namespace {namespace} are not running after {timeout:?}")]
    NotRunning {
        selector: LabelSelector,
        namespace: String,
        timeout: Duration,
    },
    #[error("pods with label {selector} in namespace {namespace} are not ready after {timeout:?}")]
    NotReady {
        selector: LabelSelector,
        namespace: String,
        timeout: Duration,
    },
    #[error("pod {pod} container {container} has restarted (restart count: {count})")]
    Restarted {
        pod: String,
        container: String,
        count: i32,
    },
    #[error("no logs retrieved for pod {pod} in namespace {namespace}")]
    NoLogs { pod: String, namespace: String },
    #[error(
        "pod {pod} in namespace {namespace} did not log {pattern} within the last {time_limit_minutes} minutes"
    )]
    PatternAbsent {
        pod: String,
        namespace: String,
        pattern: String,
        time_limit_minutes: u32,
    },
    #[error("{kind} {name} does not exist")]
    Missing { kind: &'static str, name: String },
    #[error("policy {policy} not attached to role {role}")]
    PolicyNotAttached { policy: String, role: String },
    #[error("S3 bucket lifecycle configuration for {bucket} does not contain {rule}")]
    LifecycleRuleMissing { bucket: String, rule: String },
    #[error("no objects found in S3 bucket {bucket}")]
    BucketEmpty { bucket: String },
}

impl Failure {
    pub fn missing(kind: &'static str, name: impl ToString) -> Self {
        Self::Missing {
            kind,
            name: name.to_string(),
        }
    }
}
