use constcat::concat;

pub use component::thanos_components;
pub use component::ComponentCheck;
pub use duration::parse_duration;
pub use duration::DurationError;
pub use failure::Failure;
pub use naming::ClusterResources;
pub use naming::LIFECYCLE_RULE_ID;
pub use pattern::LogPattern;
pub use selector::LabelSelector;
pub use selector::SelectorError;

mod component;
mod duration;
mod failure;
mod naming;
mod pattern;
mod selector;

/// Namespace the Thanos components are deployed to by default.
pub const DEFAULT_NAMESPACE: &str = "prometheus";

/// Number of log lines fetched per pod when looking for a log pattern.
pub const DEFAULT_TAIL_LINES: i64 = 100;

/// Environments that get an IRSA role and SSM parameter each.
pub const DEFAULT_SUPPORTED_ENV: &str = "dev,test,stage,customer-hub,prod";

/// Logged by the compactor and the store-gateway after every metadata sync.
pub const SYNC_PATTERN: &str = "successfully synchronized block metadata";

pub const COMPONENT_LABEL: &str = "app.kubernetes.io/component";

pub const STOREGATEWAY_SELECTOR: &str = concat!(COMPONENT_LABEL, "=", "storegateway");
pub const COMPACTOR_SELECTOR: &str = concat!(COMPONENT_LABEL, "=", "compactor");
pub const RECEIVE_SELECTOR: &str = concat!(COMPONENT_LABEL, "=", "receive");
