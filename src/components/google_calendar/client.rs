use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use crate::meeting::MeetingDetails;
use crate::pipeline::EventScheduler;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use url::Url;

use super::models::{CreatedEvent, EventPayload};
use super::token::TokenManager;

/// Inserts events into the configured Google Calendar
pub struct GoogleCalendarClient {
    config: Arc<RwLock<Config>>,
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarClient {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            token_manager: TokenManager::new(Arc::clone(&config)),
            config,
            client: Client::new(),
        }
    }

    /// Create a calendar event and return its reference URL
    async fn insert_event(&self, details: &MeetingDetails) -> AppResult<String> {
        let (calendar_id, timezone) = {
            let config_read = self.config.read().await;
            (
                config_read.google_calendar_id.clone(),
                config_read.timezone.clone(),
            )
        };

        let token = self.token_manager.get_token().await?;
        let access_token = token
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| google_calendar_error("No access token available"))?;

        let url_str = format!(
            "https://www.googleapis.com/calendar/v3/calendars/{}/events",
            calendar_id
        );
        let url = Url::parse(&url_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        let payload = EventPayload::from_details(details, &timezone);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to create event: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to create event: HTTP {} - {}",
                status, error_body
            )));
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse event response: {}", e)))?;

        let link = created
            .html_link
            .or(created.id)
            .ok_or_else(|| google_calendar_error("Event response missing 'htmlLink' field"))?;

        info!("Created calendar event: {}", link);
        Ok(link)
    }
}

#[async_trait]
impl EventScheduler for GoogleCalendarClient {
    async fn schedule(&self, details: &MeetingDetails) -> AppResult<String> {
        self.insert_event(details).await
    }
}
