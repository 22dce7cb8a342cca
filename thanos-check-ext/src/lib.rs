pub use k8s_openapi::api::core::v1 as corev1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub use phase::PodPhase;

mod phase;

pub trait PodExt {
    fn phase(&self) -> PodPhase;
    fn container_statuses(&self) -> &[corev1::ContainerStatus];

    /// Phase is `Running`, regardless of container readiness.
    fn is_running(&self) -> bool {
        self.phase() == PodPhase::Running
    }

    /// Phase is `Running` and every container reports ready.
    ///
    /// A pod whose container statuses have not been populated yet is not ready.
    fn is_ready(&self) -> bool {
        let statuses = self.container_statuses();
        self.is_running() && !statuses.is_empty() && statuses.iter().all(|status| status.ready)
    }

    /// `(container, restart_count)` for every container status.
    fn restart_counts(&self) -> Vec<(&str, i32)> {
        self.container_statuses()
            .iter()
            .map(|status| (status.name.as_str(), status.restart_count))
            .collect()
    }
}

impl PodExt for corev1::Pod {
    fn phase(&self) -> PodPhase {
        self.status
            .as_ref()
            .and_then(|status| status.phase.as_deref())
            .map(PodPhase::from)
            .unwrap_or_default()
    }

    fn container_statuses(&self) -> &[corev1::ContainerStatus] {
        self.status
            .as_ref()
            .and_then(|status| status.container_statuses.as_deref())
            .unwrap_or_default()
    }
}
