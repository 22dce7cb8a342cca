use std::fmt;
use std::str::FromStr;

/// A single `key=value` equality selector identifying a pod group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabelSelector {
    key: String,
    value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("label selector is empty")]
    Empty,
    #[error(r#"label selector "{0}" is not of the form key=value"#)]
    MissingEquals(String),
    #[error(r#"label selector "{0}" has an empty key"#)]
    EmptyKey(String),
    #[error(r#"label selector "{0}" has an empty value"#)]
    EmptyValue(String),
}

impl LabelSelector {
    pub fn new(key: impl ToString, value: impl ToString) -> Result<Self, SelectorError> {
        format!("{}={}", key.to_string(), value.to_string()).parse()
    }

    /// `app.kubernetes.io/component=<component>`, for a known non-empty component name.
    pub(crate) fn component(component: &'static str) -> Self {
        Self {
            key: crate::COMPONENT_LABEL.to_string(),
            value: component.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for LabelSelector {
    type Err = SelectorError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SelectorError::Empty);
        }

        let (key, value) = text
            .split_once('=')
            .ok_or_else(|| SelectorError::MissingEquals(text.to_string()))?;
        let key = key.trim();
        let value = value.trim();

        if key.is_empty() {
            Err(SelectorError::EmptyKey(text.to_string()))
        } else if value.is_empty() {
            Err(SelectorError::EmptyValue(text.to_string()))
        } else {
            Ok(Self {
                key: key.to_string(),
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
