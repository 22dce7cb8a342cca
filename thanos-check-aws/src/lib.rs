use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::error::ProvideErrorMetadata as _;
use thanos_check::ClusterResources;
use thanos_check::Failure;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An AWS call failed for a reason other than the resource not existing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{operation} failed: {message}")]
    Sdk {
        operation: &'static str,
        message: String,
    },
}

impl Error {
    fn sdk(operation: &'static str, err: &impl std::error::Error) -> Self {
        Self::Sdk {
            operation,
            message: DisplayErrorContext(err).to_string(),
        }
    }
}

/// Read-only checks of the AWS resources backing Thanos.
///
/// Every check returns `Ok(None)` when the resource looks right, `Ok(Some(_))`
/// for a functional failure, and `Err` when AWS could not be asked at all.
#[derive(Clone, Debug)]
pub struct AwsChecker {
    iam: aws_sdk_iam::Client,
    ssm: aws_sdk_ssm::Client,
    s3: aws_sdk_s3::Client,
}

impl AwsChecker {
    /// Clients built from the default credential and region chain.
    pub async fn new() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::from_conf(&config)
    }

    pub fn from_conf(config: &SdkConfig) -> Self {
        Self {
            iam: aws_sdk_iam::Client::new(config),
            ssm: aws_sdk_ssm::Client::new(config),
            s3: aws_sdk_s3::Client::new(config),
        }
    }

    pub async fn check_irsa_role(&self, role: &str) -> Result<Option<Failure>> {
        match self.iam.get_role().role_name(role).send().await {
            Ok(_) => Ok(None),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|err| err.is_no_such_entity_exception()) =>
            {
                Ok(Some(Failure::missing("IRSA role", role)))
            }
            Err(err) => Err(Error::sdk("iam:GetRole", &err)),
        }
    }

    pub async fn check_policy_attached(&self, role: &str, policy: &str) -> Result<Option<Failure>> {
        let not_attached = || Failure::PolicyNotAttached {
            policy: policy.to_string(),
            role: role.to_string(),
        };

        match self
            .iam
            .list_attached_role_policies()
            .role_name(role)
            .send()
            .await
        {
            Ok(output) => {
                let attached = output
                    .attached_policies()
                    .iter()
                    .any(|attached| attached.policy_name() == Some(policy));
                Ok((!attached).then(not_attached))
            }
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|err| err.is_no_such_entity_exception()) =>
            {
                Ok(Some(not_attached()))
            }
            Err(err) => Err(Error::sdk("iam:ListAttachedRolePolicies", &err)),
        }
    }

    pub async fn check_ssm_parameter(&self, name: &str) -> Result<Option<Failure>> {
        match self.ssm.get_parameter().name(name).send().await {
            Ok(_) => Ok(None),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|err| err.is_parameter_not_found()) =>
            {
                Ok(Some(Failure::missing("SSM parameter", name)))
            }
            Err(err) => Err(Error::sdk("ssm:GetParameter", &err)),
        }
    }

    pub async fn check_bucket_exists(&self, bucket: &str) -> Result<Option<Failure>> {
        match self.s3.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(None),
            Err(err) if err.as_service_error().is_some_and(|err| err.is_not_found()) => {
                Ok(Some(Failure::missing("S3 bucket", bucket)))
            }
            Err(err) => Err(Error::sdk("s3:HeadBucket", &err)),
        }
    }

    pub async fn check_lifecycle_rule(&self, bucket: &str, rule: &str) -> Result<Option<Failure>> {
        match self
            .s3
            .get_bucket_lifecycle_configuration()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(output) => {
                let found = output.rules().iter().any(|r| r.id() == Some(rule));
                Ok((!found).then(|| Failure::LifecycleRuleMissing {
                    bucket: bucket.to_string(),
                    rule: rule.to_string(),
                }))
            }
            Err(err) => match err.as_service_error().and_then(|err| err.code()) {
                Some("NoSuchLifecycleConfiguration") => Ok(Some(Failure::missing(
                    "S3 bucket lifecycle configuration for",
                    bucket,
                ))),
                Some("NoSuchBucket") => Ok(Some(Failure::missing("S3 bucket", bucket))),
                _ => Err(Error::sdk("s3:GetBucketLifecycleConfiguration", &err)),
            },
        }
    }

    /// Thanos ships blocks to the bucket; an empty bucket means nothing was uploaded.
    pub async fn check_bucket_has_objects(&self, bucket: &str) -> Result<Option<Failure>> {
        match self.s3.list_objects_v2().bucket(bucket).max_keys(1).send().await {
            Ok(output) => Ok(output.contents().is_empty().then(|| Failure::BucketEmpty {
                bucket: bucket.to_string(),
            })),
            Err(err) if err.as_service_error().is_some_and(|err| err.is_no_such_bucket()) => {
                Ok(Some(Failure::missing("S3 bucket", bucket)))
            }
            Err(err) => Err(Error::sdk("s3:ListObjectsV2", &err)),
        }
    }

    /// Runs every AWS check for `resources`.
    ///
    /// A check AWS could not answer is recorded and the remaining checks still
    /// run. The lifecycle and content checks only run once the bucket is known
    /// to exist.
    pub async fn run(&self, resources: &ClusterResources) -> Findings {
        let mut findings = Findings::default();
        let policy = resources.irsa_policy();

        for env in &resources.environments {
            let role = resources.irsa_role(env);
            tracing::info!(env, role, "Checking IRSA role");
            findings.add(self.check_irsa_role(&role).await);
            findings.add(self.check_policy_attached(&role, &policy).await);

            let parameter = resources.irsa_role_parameter(env);
            tracing::info!(env, parameter, "Checking SSM parameter");
            findings.add(self.check_ssm_parameter(&parameter).await);
        }

        findings.add(
            self.check_ssm_parameter(&resources.storage_uri_parameter())
                .await,
        );

        let bucket = resources.bucket();
        tracing::info!(bucket, "Checking S3 bucket");
        if findings.add(self.check_bucket_exists(&bucket).await) {
            findings.add(
                self.check_lifecycle_rule(&bucket, resources.lifecycle_rule())
                    .await,
            );
            findings.add(self.check_bucket_has_objects(&bucket).await);
        } else {
            tracing::info!(bucket, "Skipping lifecycle and content checks");
        }

        findings
    }
}

/// Outcome of [`AwsChecker::run`].
#[derive(Debug, Default)]
pub struct Findings {
    pub failures: Vec<Failure>,
    /// Checks that could not be answered at all.
    pub errors: Vec<Error>,
}

impl Findings {
    /// Records one check, returning whether it passed.
    fn add(&mut self, result: Result<Option<Failure>>) -> bool {
        match result {
            Ok(None) => true,
            Ok(Some(failure)) => {
                self.failures.push(failure);
                false
            }
            Err(err) => {
                tracing::warn!(%err, "AWS check could not be completed");
                self.errors.push(err);
                false
            }
        }
    }
}
