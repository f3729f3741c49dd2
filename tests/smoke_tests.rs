use calpilot::config::{Config, DEFAULT_CALENDAR_ID, DEFAULT_OPENAI_MODEL};
use calpilot::meeting::MeetingDetails;

fn test_config(timezone: &str) -> Config {
    Config {
        openai_api_key: "test_openai_key".to_string(),
        openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        google_client_id: String::new(),
        google_client_secret: String::new(),
        google_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        token_path: "config/token.json".to_string(),
        timezone: timezone.to_string(),
    }
}

/// Smoke test to verify a config parses its timezone
#[tokio::test]
async fn test_config_timezone_parses() {
    let config = test_config("Europe/Helsinki");
    assert_eq!(config.tz().unwrap().name(), "Europe/Helsinki");
}

/// A bad timezone is a configuration error, not a panic
#[tokio::test]
async fn test_config_rejects_unknown_timezone() {
    let config = test_config("Mars/Olympus_Mons");
    assert!(config.tz().is_err());
}

/// The extraction record round-trips through JSON with field order intact
#[tokio::test]
async fn test_meeting_details_roundtrip() {
    let details = MeetingDetails {
        summary: "Sprint review".to_string(),
        start_time: "2025-06-11T14:00:00".to_string(),
        end_time: "2025-06-11T15:00:00".to_string(),
        description: "Demo and retro".to_string(),
        attendees: vec!["bob@example.com".to_string(), "ann@example.com".to_string()],
    };

    let json = serde_json::to_string(&details).unwrap();
    let parsed: MeetingDetails = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, details);
    assert_eq!(parsed.attendees[0], "bob@example.com");
}
