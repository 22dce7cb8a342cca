use std::time::Duration;

use clap::Parser;
use thanos_check::ClusterResources;
use thanos_check::ComponentCheck;
use thanos_check::DEFAULT_NAMESPACE;
use thanos_check::DEFAULT_SUPPORTED_ENV;
use thanos_check::DEFAULT_TAIL_LINES;
use thanos_check_verifier::PollSettings;

/// Checks a deployed Thanos stack and the AWS resources backing it.
#[derive(Debug, Parser)]
#[command(name = "thanos-check", version)]
pub(crate) struct Config {
    /// Cluster the stack runs on; AWS resource names are derived from it
    #[arg(long, env = "CLUSTER_NAME")]
    pub(crate) cluster_name: String,

    /// Environments with their own IRSA role and SSM parameter
    #[arg(long, env = "SUPPORTED_ENV", default_value = DEFAULT_SUPPORTED_ENV, value_delimiter = ',')]
    pub(crate) supported_env: Vec<String>,

    /// Namespace the Thanos components are deployed to
    #[arg(long, env = "THANOS_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub(crate) namespace: String,

    /// How long to wait for each component's pods, e.g. `5m` or `90s`
    #[arg(long, default_value = "5m", value_parser = thanos_check::parse_duration)]
    pub(crate) timeout: Duration,

    /// Pause between two pod status polls
    #[arg(long, default_value = "5s", value_parser = thanos_check::parse_duration)]
    pub(crate) poll_interval: Duration,

    /// Log lines fetched per pod
    #[arg(long, default_value_t = DEFAULT_TAIL_LINES, value_parser = clap::value_parser!(i64).range(1..))]
    pub(crate) tail_lines: i64,

    #[arg(long)]
    pub(crate) skip_aws: bool,

    #[arg(long)]
    pub(crate) skip_kubernetes: bool,
}

impl Config {
    pub(crate) fn poll_settings(&self) -> PollSettings {
        PollSettings::new(self.timeout, self.poll_interval)
    }

    pub(crate) fn resources(&self) -> ClusterResources {
        ClusterResources::new(&self.cluster_name, &self.supported_env)
    }

    pub(crate) fn components(&self) -> Vec<ComponentCheck> {
        thanos_check::thanos_components(&self.namespace)
            .into_iter()
            .map(|check| check.tail_lines(self.tail_lines))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["thanos-check", "--cluster-name", "eks-blue"]).unwrap();
        assert_eq!(config.namespace, "prometheus");
        assert_eq!(
            config.supported_env,
            ["dev", "test", "stage", "customer-hub", "prod"]
        );
        assert_eq!(
            config.poll_settings(),
            PollSettings::new(Duration::from_secs(300), Duration::from_secs(5))
        );
        assert_eq!(config.resources().bucket(), "eks-blue-thanos-bucket");
        assert!(config.components().iter().all(|check| check.tail_lines == 100));
    }

    #[test]
    fn go_durations() {
        let config = Config::try_parse_from([
            "thanos-check",
            "--cluster-name",
            "eks-blue",
            "--timeout",
            "2m30s",
            "--poll-interval",
            "500ms",
            "--supported-env",
            "dev,prod",
        ])
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(150));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.resources().environments, ["dev", "prod"]);
    }

    #[test]
    fn rejects_bad_values() {
        let args = ["thanos-check", "--cluster-name", "eks-blue", "--timeout", "0s"];
        assert!(Config::try_parse_from(args).is_err());
        let args = ["thanos-check", "--cluster-name", "eks-blue", "--tail-lines", "0"];
        assert!(Config::try_parse_from(args).is_err());
    }
}
