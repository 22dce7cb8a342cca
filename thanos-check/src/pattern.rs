use std::fmt;

use regex::Regex;

/// What a log line has to contain for a component to count as healthy.
#[derive(Clone, Debug)]
pub enum LogPattern {
    Literal(String),
    Regex(Regex),
}

impl LogPattern {
    pub fn literal(text: impl ToString) -> Self {
        Self::Literal(text.to_string())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Regex)
    }

    /// The metadata sync message logged by the compactor and the store-gateway.
    pub fn sync() -> Self {
        Self::literal(crate::SYNC_PATTERN)
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            Self::Literal(text) => line.contains(text.as_str()),
            Self::Regex(regex) => regex.is_match(line),
        }
    }
}

impl fmt::Display for LogPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text:?}"),
            Self::Regex(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matches_substring() {
        let pattern = LogPattern::sync();
        assert!(pattern.is_match(
            r#"level=info ts=2024-05-01T10:00:00Z caller=fetcher.go:478 msg="successfully synchronized block metadata" duration=12ms"#
        ));
        assert!(!pattern.is_match("level=info msg=\"starting compact node\""));
    }

    #[test]
    fn literal_is_not_a_regex() {
        let pattern = LogPattern::literal("a.c");
        assert!(pattern.is_match("xa.cx"));
        assert!(!pattern.is_match("abc"));
    }

    #[test]
    fn regex_matches() {
        let pattern = LogPattern::regex(r"synchronized block metadata.*duration=\d+ms").unwrap();
        assert!(pattern.is_match("successfully synchronized block metadata duration=4ms"));
        assert!(!pattern.is_match("successfully synchronized block metadata"));
        assert!(LogPattern::regex("(").is_err());
    }
}
