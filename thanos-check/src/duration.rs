use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error(r#"invalid duration "{text}": {reason}"#)]
    Invalid { text: String, reason: String },
    #[error(r#"duration "{0}" must be positive"#)]
    NotPositive(String),
}

/// Parses a Go style duration (`90s`, `2m30s`, `1h`) into a positive `Duration`.
pub fn parse_duration(text: &str) -> Result<Duration, DurationError> {
    let nanos = go_parse_duration::parse_duration(text).map_err(|err| DurationError::Invalid {
        text: text.to_string(),
        reason: format!("{err:?}"),
    })?;
    u64::try_from(nanos)
        .ok()
        .filter(|nanos| *nanos > 0)
        .map(Duration::from_nanos)
        .ok_or_else(|| DurationError::NotPositive(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_syntax() {
        assert_eq!(parse_duration("90s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_duration("2m30s"), Ok(Duration::from_secs(150)));
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(matches!(parse_duration("0s"), Err(DurationError::NotPositive(_))));
        assert!(matches!(parse_duration("soon"), Err(DurationError::Invalid { .. })));
    }
}
