/// Names of the AWS resources provisioned for Thanos on one cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterResources {
    pub cluster: String,
    pub environments: Vec<String>,
}

pub const LIFECYCLE_RULE_ID: &str = "thanos_bucket_lifecycle_rule";

impl ClusterResources {
    pub fn new(cluster: impl ToString, environments: impl IntoIterator<Item = impl ToString>) -> Self {
        let environments = environments
            .into_iter()
            .map(|env| env.to_string().trim().to_string())
            .filter(|env| !env.is_empty())
            .collect();
        Self {
            cluster: cluster.to_string(),
            environments,
        }
    }

    /// Splits a comma separated `SUPPORTED_ENV` value.
    pub fn from_env_list(cluster: impl ToString, environments: &str) -> Self {
        Self::new(cluster, environments.split(','))
    }

    pub fn irsa_role(&self, env: &str) -> String {
        format!("{}-irsa-thanos-{env}", self.cluster)
    }

    pub fn irsa_policy(&self) -> String {
        format!("{}-thanos-irsa-policy", self.cluster)
    }

    pub fn irsa_role_parameter(&self, env: &str) -> String {
        format!(
            "/{}/pcpt/config/k8s-config/accounts/{env}/irsa-role/thanos/arn",
            self.cluster
        )
    }

    pub fn storage_uri_parameter(&self) -> String {
        format!(
            "/{}/pcpt/config/k8s-config/accounts/customer-hub/service/storage/thanos/uri",
            self.cluster
        )
    }

    pub fn bucket(&self) -> String {
        format!("{}-thanos-bucket", self.cluster)
    }

    pub fn lifecycle_rule(&self) -> &'static str {
        LIFECYCLE_RULE_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let resources = ClusterResources::from_env_list("eks-blue", "dev, prod,,");
        assert_eq!(resources.environments, ["dev", "prod"]);
        assert_eq!(resources.irsa_role("dev"), "eks-blue-irsa-thanos-dev");
        assert_eq!(resources.irsa_policy(), "eks-blue-thanos-irsa-policy");
        assert_eq!(
            resources.irsa_role_parameter("prod"),
            "/eks-blue/pcpt/config/k8s-config/accounts/prod/irsa-role/thanos/arn"
        );
        assert_eq!(
            resources.storage_uri_parameter(),
            "/eks-blue/pcpt/config/k8s-config/accounts/customer-hub/service/storage/thanos/uri"
        );
        assert_eq!(resources.bucket(), "eks-blue-thanos-bucket");
    }
}
