use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use interim::{parse_date_string, Dialect};
use tracing::debug;

/// Local timestamp format used everywhere in a meeting record
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a timestamp in the local `YYYY-MM-DDTHH:MM:SS` format
pub fn parse_local_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, LOCAL_TIMESTAMP_FORMAT)
}

/// Format a timestamp in the local `YYYY-MM-DDTHH:MM:SS` format
pub fn format_local_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(LOCAL_TIMESTAMP_FORMAT).to_string()
}

/// Resolve a free-form date/time phrase to an absolute local timestamp.
///
/// Relative phrases ("tomorrow at 2pm", "next Monday") are anchored at
/// `reference`. Empty input and already-absolute timestamps pass through
/// unchanged. Text the parser cannot resolve is also returned unchanged so a
/// later validation stage rejects it as malformed instead of missing.
pub fn normalize_date_phrase(text: &str, reference: DateTime<Tz>) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    if parse_local_timestamp(text).is_ok() {
        return text.to_string();
    }

    if let Ok(resolved) = parse_date_string(text, reference, Dialect::Us) {
        return format_local_timestamp(resolved.naive_local());
    }

    // The phrase parser is strict about filler words; retry once with the
    // connective "at" collapsed ("tomorrow at 2pm" -> "tomorrow 2pm")
    let collapsed = text.replace(" at ", " ");
    if collapsed != text {
        if let Ok(resolved) = parse_date_string(&collapsed, reference, Dialect::Us) {
            return format_local_timestamp(resolved.naive_local());
        }
    }

    debug!("Could not resolve date phrase, passing through: {}", text);
    text.to_string()
}
