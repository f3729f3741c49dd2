use crate::config::Config;
use crate::error::{extraction_error, AppResult};
use crate::meeting::MeetingDetails;
use crate::pipeline::CommandExtractor;
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::openai::Client as OpenAiClient;
use serde_json::from_str;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are an assistant that extracts structured meeting details for scheduling events in Google Calendar.";

const USER_PROMPT_TEMPLATE: &str = r#"Given today's date is {today}.
Extract meeting details from the following command:
"{command}"

Return only valid JSON with exactly the following keys:
- "summary": The meeting title.
- "start_time": The start time in ISO 8601 format (YYYY-MM-DDTHH:MM:SS).
- "end_time": The end time in ISO 8601 format (YYYY-MM-DDTHH:MM:SS).
- "description": The meeting description or agenda.
- "attendees": A list of email addresses.

If a detail is not mentioned, set its value to an empty string (or an empty list for "attendees").
If the command includes relative dates (like "tomorrow"), calculate the correct absolute date using today's date ({today}).
Output only the JSON object and nothing else."#;

/// Extracts meeting details from a command with an OpenAI chat model
pub struct OpenAiExtractor {
    client: OpenAiClient,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            client: OpenAiClient::new(&config.openai_api_key),
            model: config.openai_model.clone(),
        }
    }
}

#[async_trait]
impl CommandExtractor for OpenAiExtractor {
    async fn extract(&self, command: &str, reference_date: &str) -> AppResult<MeetingDetails> {
        info!("Extracting meeting details with model {}", self.model);

        let user_prompt = USER_PROMPT_TEMPLATE
            .replace("{today}", reference_date)
            .replace("{command}", command);

        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PROMPT)
            .temperature(0.0)
            .build();

        let response = agent
            .chat(user_prompt, Vec::<Message>::new())
            .await
            .map_err(|e| extraction_error(&format!("OpenAI request failed: {}", e)))?;

        debug!("Raw extraction response: {}", response);
        parse_meeting_json(&response)
    }
}

/// Parse meeting details JSON out of a model response
fn parse_meeting_json(response: &str) -> AppResult<MeetingDetails> {
    let unfenced = strip_code_fence(response.trim());

    match from_str::<MeetingDetails>(unfenced) {
        Ok(details) => return Ok(details),
        Err(e) => debug!("Response is not clean JSON: {}", e),
    }

    // Try the outermost object span in case the model added prose around it
    if let (Some(json_start), Some(json_end)) = (unfenced.find('{'), unfenced.rfind('}')) {
        if json_start < json_end {
            let json_str = &unfenced[json_start..=json_end];
            if let Ok(details) = from_str::<MeetingDetails>(json_str) {
                return Ok(details);
            }
        }
    }

    Err(extraction_error(
        "Could not extract valid JSON from the model response",
    ))
}

/// Drop a leading/trailing markdown code fence around the response
fn strip_code_fence(response: &str) -> &str {
    let stripped = response
        .strip_prefix("```json")
        .or_else(|| response.strip_prefix("```"))
        .unwrap_or(response);
    stripped.strip_suffix("```").unwrap_or(stripped).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"summary": "Meeting with Bob", "start_time": "tomorrow at 2pm", "end_time": "", "description": "", "attendees": []}"#;

    #[test]
    fn parses_clean_json() {
        let details = parse_meeting_json(CLEAN).unwrap();
        assert_eq!(details.summary, "Meeting with Bob");
        assert_eq!(details.start_time, "tomorrow at 2pm");
    }

    #[test]
    fn strips_markdown_fence() {
        let fenced = format!("```json\n{}\n```", CLEAN);
        let details = parse_meeting_json(&fenced).unwrap();
        assert_eq!(details.summary, "Meeting with Bob");
    }

    #[test]
    fn recovers_json_embedded_in_prose() {
        let chatty = format!("Here are the details you asked for:\n{}\nLet me know!", CLEAN);
        let details = parse_meeting_json(&chatty).unwrap();
        assert_eq!(details.summary, "Meeting with Bob");
    }

    #[test]
    fn rejects_responses_without_json() {
        assert!(parse_meeting_json("I could not find any meeting details.").is_err());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let details = parse_meeting_json(r#"{"summary": "Standup"}"#).unwrap();
        assert_eq!(details.end_time, "");
        assert!(details.attendees.is_empty());
    }
}
