use crate::meeting::MeetingDetails;
use serde::{Deserialize, Serialize};

/// One side of an event's time window, in the calendar's wire format
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// Attendee entry in the calendar's wire format
#[derive(Debug, Clone, Serialize)]
pub struct EventAttendee {
    pub email: String,
}

/// Request body for inserting a calendar event
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub summary: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    pub attendees: Vec<EventAttendee>,
}

impl EventPayload {
    /// Build the insert payload from a schedulable record, stamping both
    /// local timestamps with the single configured timezone
    pub fn from_details(details: &MeetingDetails, timezone: &str) -> Self {
        Self {
            summary: details.summary.clone(),
            description: details.description.clone(),
            start: EventDateTime {
                date_time: details.start_time.clone(),
                time_zone: timezone.to_string(),
            },
            end: EventDateTime {
                date_time: details.end_time.clone(),
                time_zone: timezone.to_string(),
            },
            attendees: details
                .attendees
                .iter()
                .map(|email| EventAttendee {
                    email: email.clone(),
                })
                .collect(),
        }
    }
}

/// Relevant fields of the insert response
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedEvent {
    pub id: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_timezone_and_attendee_order() {
        let details = MeetingDetails {
            summary: "Planning".to_string(),
            start_time: "2025-06-11T14:00:00".to_string(),
            end_time: "2025-06-11T15:00:00".to_string(),
            description: String::new(),
            attendees: vec!["bob@example.com".to_string(), "ann@example.com".to_string()],
        };

        let payload = EventPayload::from_details(&details, "Europe/Helsinki");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["start"]["dateTime"], "2025-06-11T14:00:00");
        assert_eq!(json["start"]["timeZone"], "Europe/Helsinki");
        assert_eq!(json["attendees"][0]["email"], "bob@example.com");
        assert_eq!(json["attendees"][1]["email"], "ann@example.com");
    }
}
