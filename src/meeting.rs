use crate::utils::time::{format_local_timestamp, parse_local_timestamp};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Length of a meeting when the command gives no end time
pub const DEFAULT_MEETING_DURATION_HOURS: i64 = 1;

/// Structured meeting details extracted from a single command.
///
/// Empty strings mean "not mentioned"; attendees keep the order the
/// extraction produced. Partial JSON from the extractor deserializes with
/// every missing field defaulted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeetingDetails {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attendees: Vec<String>,
}

/// What applying the default end time did to a record
#[derive(Debug)]
pub enum DefaultingOutcome {
    /// End time was filled in as start + 1 hour
    Applied,
    /// Guard did not fire: end time already set or start time absent
    Unchanged,
    /// Start time was present but not a well-formed local timestamp;
    /// the record is untouched and the caller decides how to report it
    StartUnparseable(chrono::ParseError),
}

impl MeetingDetails {
    /// Fill in a missing end time as one hour after the start time.
    ///
    /// Idempotent: once the end time is set the guard never fires again.
    pub fn apply_default_end_time(&mut self) -> DefaultingOutcome {
        if !self.end_time.trim().is_empty() || self.start_time.is_empty() {
            return DefaultingOutcome::Unchanged;
        }

        match parse_local_timestamp(&self.start_time) {
            Ok(start) => {
                let end = start + Duration::hours(DEFAULT_MEETING_DURATION_HOURS);
                self.end_time = format_local_timestamp(end);
                DefaultingOutcome::Applied
            }
            Err(e) => DefaultingOutcome::StartUnparseable(e),
        }
    }

    /// Minimum-field gate: a record can be scheduled once the summary and
    /// both timestamps are present
    pub fn is_schedulable(&self) -> bool {
        !self.summary.is_empty() && !self.start_time.is_empty() && !self.end_time.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(start: &str, end: &str) -> MeetingDetails {
        MeetingDetails {
            summary: "Meeting with Bob".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_end_time_is_one_hour_after_start() {
        let mut details = record("2025-06-11T14:00:00", "");
        assert!(matches!(
            details.apply_default_end_time(),
            DefaultingOutcome::Applied
        ));
        assert_eq!(details.end_time, "2025-06-11T15:00:00");
    }

    #[test]
    fn existing_end_time_is_kept() {
        let mut details = record("2025-06-11T14:00:00", "2025-06-11T16:30:00");
        assert!(matches!(
            details.apply_default_end_time(),
            DefaultingOutcome::Unchanged
        ));
        assert_eq!(details.end_time, "2025-06-11T16:30:00");
    }

    #[test]
    fn defaulting_is_idempotent() {
        let mut details = record("2025-06-11T14:00:00", "");
        details.apply_default_end_time();
        let after_once = details.clone();
        details.apply_default_end_time();
        assert_eq!(details, after_once);
    }

    #[test]
    fn missing_start_time_leaves_end_time_empty() {
        let mut details = record("", "");
        assert!(matches!(
            details.apply_default_end_time(),
            DefaultingOutcome::Unchanged
        ));
        assert_eq!(details.end_time, "");
    }

    #[test]
    fn unparseable_start_time_is_reported_not_fatal() {
        let mut details = record("not a date", "");
        assert!(matches!(
            details.apply_default_end_time(),
            DefaultingOutcome::StartUnparseable(_)
        ));
        assert_eq!(details.end_time, "");
    }

    #[test]
    fn schedulable_requires_summary_and_both_times() {
        assert!(record("x", "y").is_schedulable());
        assert!(!record("", "y").is_schedulable());
        assert!(!record("x", "").is_schedulable());

        let mut no_summary = record("x", "y");
        no_summary.summary = String::new();
        assert!(!no_summary.is_schedulable());
    }

    #[test]
    fn partial_json_deserializes_with_defaults() {
        let details: MeetingDetails =
            serde_json::from_str(r#"{"summary": "Standup"}"#).unwrap();
        assert_eq!(details.summary, "Standup");
        assert_eq!(details.start_time, "");
        assert!(details.attendees.is_empty());
    }
}
