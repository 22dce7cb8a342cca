use std::time::Duration;

use chrono::Utc;
use kube::ResourceExt as _;
use thanos_check::ComponentCheck;
use thanos_check::Failure;
use thanos_check::LabelSelector;
use thanos_check_ext as k8s;
use thanos_check_kubeapi::KubeApi;
use thanos_check_kubeapi::LogRequest;
use thanos_check_kubeapi::PodApi;
use time::ext::NumericalStdDuration as _;
use tokio::time::Instant;

use k8s::corev1;
use k8s::PodExt as _;

pub use logs::check_logs_for_pattern;
pub use logs::check_logs_for_sync_pattern;
pub use logs::LogLine;
pub use thanos_check_kubeapi::Error;
pub use thanos_check_kubeapi::Result;

mod logs;

/// How long to wait for a pod group, and how often to look.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollSettings {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }

    /// The interval, never longer than the timeout.
    fn interval(&self) -> Duration {
        self.interval.min(self.timeout)
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self::new(5.std_minutes(), 5.std_seconds())
    }
}

#[derive(Debug)]
pub struct PodVerifier<A = KubeApi> {
    api: A,
    settings: PollSettings,
}

impl PodVerifier<KubeApi> {
    /// Verifier backed by the ambient cluster configuration.
    pub async fn connect(settings: PollSettings) -> kube::Result<Self> {
        let api = KubeApi::new().await?;
        Ok(Self::new(api, settings))
    }
}

impl<A: PodApi> PodVerifier<A> {
    pub fn new(api: A, settings: PollSettings) -> Self {
        Self { api, settings }
    }

    /// Waits until every pod matching `selector` is in phase `Running`.
    ///
    /// Returns `Ok(false)` once the timeout passes without that happening, and
    /// `Err` only when the API rejects our credentials.
    pub async fn wait_for_pod_running(&self, selector: &LabelSelector, namespace: &str) -> Result<bool> {
        self.wait_for_pod_running_with(selector, namespace, self.settings)
            .await
    }

    pub async fn wait_for_pod_running_with(
        &self,
        selector: &LabelSelector,
        namespace: &str,
        settings: PollSettings,
    ) -> Result<bool> {
        self.poll(selector, namespace, settings, "running", |pod| {
            pod.is_running()
        })
        .await
    }

    /// Waits until every pod matching `selector` is running with all containers ready.
    pub async fn wait_for_pod_ready(&self, selector: &LabelSelector, namespace: &str) -> Result<bool> {
        self.wait_for_pod_ready_with(selector, namespace, self.settings)
            .await
    }

    pub async fn wait_for_pod_ready_with(
        &self,
        selector: &LabelSelector,
        namespace: &str,
        settings: PollSettings,
    ) -> Result<bool> {
        self.poll(selector, namespace, settings, "ready", |pod| pod.is_ready())
            .await
    }

    async fn poll(
        &self,
        selector: &LabelSelector,
        namespace: &str,
        settings: PollSettings,
        state: &str,
        predicate: impl Fn(&corev1::Pod) -> bool,
    ) -> Result<bool> {
        let label = selector.to_string();
        let deadline = Instant::now() + settings.timeout;
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            match self.api.list_pods(namespace, &label).await {
                Ok(pods) if !pods.is_empty() && pods.iter().all(&predicate) => {
                    tracing::info!(selector = label, namespace, attempt, count = pods.len(), "Pods are {state}");
                    return Ok(true);
                }
                Ok(pods) => {
                    tracing::debug!(selector = label, namespace, attempt, count = pods.len(), "Pods not {state} yet");
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(selector = label, namespace, %err, "Giving up on pods");
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(selector = label, namespace, attempt, %err, "Failed to list pods");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                tracing::warn!(selector = label, namespace, timeout = ?settings.timeout, "Timed out waiting for pods to be {state}");
                return Ok(false);
            }
            tokio::time::sleep(settings.interval().min(deadline - now)).await;
        }
    }

    /// Single-shot list of the pods matching `selector`.
    pub async fn get_pods(&self, selector: &LabelSelector, namespace: &str) -> Result<Vec<corev1::Pod>> {
        self.api.list_pods(namespace, &selector.to_string()).await
    }

    pub async fn get_deployment_pod_names(
        &self,
        selector: &LabelSelector,
        namespace: &str,
    ) -> Result<Vec<String>> {
        let pods = self.get_pods(selector, namespace).await?;
        Ok(pods.iter().map(|pod| pod.name_any()).collect())
    }

    /// One `Failure::Restarted` per container that has restarted at least once.
    ///
    /// Not retried: a restart has already happened and waiting will not undo it.
    pub async fn check_restart_counts(
        &self,
        selector: &LabelSelector,
        namespace: &str,
    ) -> Result<Vec<Failure>> {
        let names = self.get_deployment_pod_names(selector, namespace).await?;
        self.restart_failures(namespace, &names).await
    }

    async fn restart_failures(&self, namespace: &str, names: &[String]) -> Result<Vec<Failure>> {
        let mut failures = Vec::new();
        for name in names {
            let pod = self.api.get_pod(namespace, name).await?;
            let phase = pod.phase();
            for (container, count) in pod.restart_counts() {
                tracing::info!(pod = name, container, %phase, restarts = count, "Pod status");
                if count != 0 {
                    failures.push(Failure::Restarted {
                        pod: name.clone(),
                        container: container.to_string(),
                        count,
                    });
                }
            }
        }
        Ok(failures)
    }

    /// The last `line_count` lines of `container` (or the default container),
    /// oldest first. A pod that has not logged anything yields an empty vector.
    pub async fn get_latest_pod_logs(
        &self,
        pod_name: &str,
        container: Option<&str>,
        namespace: &str,
        line_count: i64,
    ) -> Result<Vec<LogLine>> {
        let request = LogRequest {
            container: container.map(str::to_string),
            tail_lines: Some(line_count),
            timestamps: true,
        };
        let logs = self.api.pod_logs(namespace, pod_name, &request).await?;
        Ok(logs::parse_lines(&logs, line_count))
    }

    /// Checks one pod's recent logs against `check`.
    ///
    /// Log reads that fail for a non-fatal reason (the container is still
    /// waiting to start, say) count as no logs.
    pub async fn check_pod_logs(&self, pod: &str, check: &ComponentCheck) -> Result<Option<Failure>> {
        let namespace = check.namespace.as_str();
        let logs = match self
            .get_latest_pod_logs(pod, check.container.as_deref(), namespace, check.tail_lines)
            .await
        {
            Ok(logs) => logs,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                tracing::warn!(pod, namespace, %err, "Failed to read pod logs");
                Vec::new()
            }
        };
        tracing::debug!(
            pod,
            namespace,
            lines = logs.len(),
            preview = %logs::preview(&logs),
            "Fetched pod logs"
        );

        if logs.is_empty() {
            return Ok(Some(Failure::NoLogs {
                pod: pod.to_string(),
                namespace: namespace.to_string(),
            }));
        }

        let Some(pattern) = &check.log_pattern else {
            return Ok(None);
        };
        let time_limit_minutes = check.time_limit_minutes();
        if check_logs_for_pattern(&logs, pattern, time_limit_minutes, Utc::now()) {
            Ok(None)
        } else {
            Ok(Some(Failure::PatternAbsent {
                pod: pod.to_string(),
                namespace: namespace.to_string(),
                pattern: pattern.to_string(),
                time_limit_minutes,
            }))
        }
    }

    /// Runs every check for one component: running, ready, restarts, logs.
    ///
    /// Functional problems are collected into the returned vector, which is
    /// empty when the component is healthy. A pod group that never starts
    /// running skips the readiness wait.
    pub async fn verify_component(&self, check: &ComponentCheck) -> Result<Vec<Failure>> {
        let ComponentCheck {
            name,
            selector,
            namespace,
            ..
        } = check;
        tracing::info!(component = name, %selector, namespace, "Checking component");

        let mut failures = Vec::new();
        let timeout = self.settings.timeout;
        if !self.wait_for_pod_running(selector, namespace).await? {
            failures.push(Failure::NotRunning {
                selector: selector.clone(),
                namespace: namespace.clone(),
                timeout,
            });
        } else if !self.wait_for_pod_ready(selector, namespace).await? {
            failures.push(Failure::NotReady {
                selector: selector.clone(),
                namespace: namespace.clone(),
                timeout,
            });
        }

        let names = self.get_deployment_pod_names(selector, namespace).await?;
        failures.extend(self.restart_failures(namespace, &names).await?);
        for pod in &names {
            failures.extend(self.check_pod_logs(pod, check).await?);
        }

        Ok(failures)
    }
}
