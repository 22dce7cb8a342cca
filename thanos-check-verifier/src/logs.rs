use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use thanos_check::LogPattern;

const PREVIEW_LINES: usize = 5;

/// One line of container output as returned by the log endpoint with
/// `timestamps=true`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: Option<DateTime<Utc>>,
    pub text: String,
}

impl LogLine {
    /// Splits the RFC 3339 prefix off `line`. Lines without one are kept
    /// whole, with no timestamp.
    pub fn parse(line: &str) -> Self {
        line.split_once(' ')
            .and_then(|(timestamp, text)| {
                DateTime::parse_from_rfc3339(timestamp)
                    .ok()
                    .map(|timestamp| Self {
                        timestamp: Some(timestamp.with_timezone(&Utc)),
                        text: text.to_string(),
                    })
            })
            .unwrap_or_else(|| Self {
                timestamp: None,
                text: line.to_string(),
            })
    }

    /// A line without a timestamp always counts as recent.
    pub fn is_within(&self, window: TimeDelta, now: DateTime<Utc>) -> bool {
        self.timestamp
            .is_none_or(|timestamp| now.signed_duration_since(timestamp) <= window)
    }
}

/// Whether any line logged within the last `time_limit_minutes` carries the
/// metadata sync message.
pub fn check_logs_for_sync_pattern(logs: &[LogLine], time_limit_minutes: u32) -> bool {
    check_logs_for_pattern(logs, &LogPattern::sync(), time_limit_minutes, Utc::now())
}

pub fn check_logs_for_pattern(
    logs: &[LogLine],
    pattern: &LogPattern,
    time_limit_minutes: u32,
    now: DateTime<Utc>,
) -> bool {
    let window = TimeDelta::try_minutes(i64::from(time_limit_minutes)).unwrap_or(TimeDelta::MAX);
    logs.iter()
        .any(|line| line.is_within(window, now) && pattern.is_match(&line.text))
}

/// The first lines of `logs`, logged to help diagnose a failing check.
pub(crate) fn preview(logs: &[LogLine]) -> String {
    logs.iter()
        .take(PREVIEW_LINES)
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn parse_lines(logs: &str, line_count: i64) -> Vec<LogLine> {
    let lines = logs
        .lines()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>();
    let keep = usize::try_from(line_count).unwrap_or_default();
    let skip = lines.len().saturating_sub(keep);
    lines[skip..].iter().map(|line| LogLine::parse(line)).collect()
}
