use std::time::Duration;

use time::ext::NumericalStdDuration as _;

use super::*;

/// One row of the declarative check table: which pods to look at and what
/// their logs are expected to show.
#[derive(Clone, Debug)]
pub struct ComponentCheck {
    pub name: String,
    pub selector: LabelSelector,
    pub namespace: String,
    /// Container to read logs from, `None` for the pod's default container.
    pub container: Option<String>,
    /// `None` only requires the logs to be non-empty.
    pub log_pattern: Option<LogPattern>,
    pub time_limit: Duration,
    pub tail_lines: i64,
}

impl ComponentCheck {
    pub fn new(name: impl ToString, selector: LabelSelector) -> Self {
        Self {
            name: name.to_string(),
            selector,
            namespace: DEFAULT_NAMESPACE.to_string(),
            container: None,
            log_pattern: None,
            time_limit: 5.std_minutes(),
            tail_lines: DEFAULT_TAIL_LINES,
        }
    }

    pub fn namespace(self, namespace: impl ToString) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..self
        }
    }

    pub fn container(self, container: impl ToString) -> Self {
        Self {
            container: Some(container.to_string()),
            ..self
        }
    }

    pub fn log_pattern(self, pattern: LogPattern) -> Self {
        Self {
            log_pattern: Some(pattern),
            ..self
        }
    }

    pub fn time_limit(self, time_limit: Duration) -> Self {
        Self { time_limit, ..self }
    }

    pub fn tail_lines(self, tail_lines: i64) -> Self {
        Self { tail_lines, ..self }
    }

    /// The time limit in whole minutes, rounded up.
    pub fn time_limit_minutes(&self) -> u32 {
        let minutes = self.time_limit.as_secs().div_ceil(60);
        u32::try_from(minutes).unwrap_or(u32::MAX)
    }
}

/// The Thanos components deployed into `namespace`.
///
/// The compactor and the store-gateway both log a metadata sync on every
/// iteration; receive has no such message, so only its logs being present is checked.
pub fn thanos_components(namespace: &str) -> Vec<ComponentCheck> {
    let component = |name: &'static str| {
        ComponentCheck::new(name, LabelSelector::component(name)).namespace(namespace)
    };

    vec![
        component("storegateway")
            .log_pattern(LogPattern::sync())
            .time_limit(3.std_minutes()),
        component("compactor")
            .log_pattern(LogPattern::sync())
            .time_limit(2.std_minutes()),
        component("receive"),
    ]
}
