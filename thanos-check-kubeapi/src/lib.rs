use std::fmt;
use std::future::Future;

use kube::api;
use thanos_check_ext as k8s;

use k8s::corev1;

pub use error::Error;
pub use error::ErrorKind;

mod error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Parameters of a single pod log read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogRequest {
    /// `None` reads the pod's default container.
    pub container: Option<String>,
    pub tail_lines: Option<i64>,
    /// Prefix every line with its RFC 3339 timestamp.
    pub timestamps: bool,
}

/// The read-only pod operations the checks need from a cluster.
pub trait PodApi {
    fn list_pods(
        &self,
        namespace: &str,
        selector: &str,
    ) -> impl Future<Output = Result<Vec<corev1::Pod>>> + Send;

    fn get_pod(&self, namespace: &str, name: &str) -> impl Future<Output = Result<corev1::Pod>> + Send;

    fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        request: &LogRequest,
    ) -> impl Future<Output = Result<String>> + Send;
}

pub struct KubeApi {
    list_params: api::ListParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi configured with the ambient Kubernetes client
    /// (kubeconfig or in-cluster service account).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), kube::Error> {
    /// let api = thanos_check_kubeapi::KubeApi::new().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new() -> kube::Result<Self> {
        kube::Client::try_default().await.map(Self::with_client)
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default(),
            client,
        }
    }

    fn pods(&self, namespace: &str) -> api::Api<corev1::Pod> {
        api::Api::namespaced(self.client.clone(), namespace)
    }

    fn list_params(&self, selector: &str) -> api::ListParams {
        self.list_params.clone().labels(selector)
    }

    fn log_params(request: &LogRequest) -> api::LogParams {
        api::LogParams {
            container: request.container.clone(),
            tail_lines: request.tail_lines,
            timestamps: request.timestamps,
            ..api::LogParams::default()
        }
    }
}

impl PodApi for KubeApi {
    /// Lists the pods in `namespace` matching the label `selector`, in API order.
    async fn list_pods(&self, namespace: &str, selector: &str) -> Result<Vec<corev1::Pod>> {
        let lp = self.list_params(selector);
        let list = self.pods(namespace).list(&lp).await?;
        tracing::trace!(namespace, selector, count = list.items.len(), "Listed pods");
        Ok(list.items)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> Result<corev1::Pod> {
        let pod = self.pods(namespace).get(name).await?;
        Ok(pod)
    }

    /// Reads the log of one container; an empty body is returned as an empty string.
    async fn pod_logs(&self, namespace: &str, name: &str, request: &LogRequest) -> Result<String> {
        let lp = Self::log_params(request);
        let logs = self.pods(namespace).logs(name, &lp).await?;
        Ok(logs)
    }
}

impl fmt::Debug for KubeApi {
    /// The `client` field is displayed as the literal `"<kube::Client>"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}
