use std::process::ExitCode;

use clap::Parser as _;
use thanos_check::ComponentCheck;
use thanos_check_aws::AwsChecker;
use thanos_check_aws::Findings;
use thanos_check_verifier::PodVerifier;
use tracing_subscriber::EnvFilter;

use config::Config;
use report::Report;

mod config;
mod report;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();
    tracing::info!(
        cluster = %config.cluster_name,
        namespace = %config.namespace,
        "Starting thanos-check"
    );

    let mut report = Report::default();
    if !config.skip_kubernetes {
        let verifier = PodVerifier::connect(config.poll_settings()).await;
        check_kubernetes(verifier, config.components(), &mut report).await;
    }
    if !config.skip_aws {
        check_aws(&config, &mut report).await;
    }

    println!("{report}");
    report.exit_code()
}

/// Components are checked one after another, each with its own timeout.
///
/// A cluster that cannot be reached is reported as one aborted suite.
async fn check_kubernetes(
    verifier: kube::Result<PodVerifier>,
    components: Vec<ComponentCheck>,
    report: &mut Report,
) {
    let verifier = match verifier {
        Ok(verifier) => verifier,
        Err(err) => {
            report.error("kubernetes", &err);
            return;
        }
    };
    for check in components {
        match verifier.verify_component(&check).await {
            Ok(failures) => report.record(&check.name, failures),
            Err(err) if err.is_fatal() => {
                report.error(&check.name, &err);
                break;
            }
            Err(err) => report.error(&check.name, &err),
        }
    }
}

async fn check_aws(config: &Config, report: &mut Report) {
    let checker = AwsChecker::new().await;
    let Findings { failures, errors } = checker.run(&config.resources()).await;
    for err in &errors {
        report.error("aws", err);
    }
    if errors.is_empty() || !failures.is_empty() {
        report.record("aws", failures);
    }
}
