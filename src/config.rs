use crate::error::{config_error, env_error, AppResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

/// Default OpenAI chat model for command extraction
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Default calendar to insert events into
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Default path for the stored OAuth token
pub const DEFAULT_TOKEN_PATH: &str = "config/token.json";

/// Main configuration structure for the scheduler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAI API key (extraction and transcription)
    pub openai_api_key: String,
    /// OpenAI chat model used for extraction
    pub openai_model: String,
    /// Google Calendar API client ID
    pub google_client_id: String,
    /// Google Calendar API client secret
    pub google_client_secret: String,
    /// Google Calendar ID to insert events into
    pub google_calendar_id: String,
    /// Path to the stored OAuth token JSON
    pub token_path: String,
    /// IANA timezone all events are scheduled in
    pub timezone: String,
}

/// Optional overrides read from config/calpilot.toml
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    openai_model: Option<String>,
    google_calendar_id: Option<String>,
    token_path: Option<String>,
    timezone: Option<String>,
}

impl Config {
    /// Load configuration from environment and optional config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let openai_api_key =
            env::var("OPENAI_API_KEY").map_err(|_| env_error("OPENAI_API_KEY"))?;
        let google_client_id =
            env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?;
        let google_client_secret =
            env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?;

        // Optional environment variables with defaults
        let openai_model =
            env::var("OPENAI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_OPENAI_MODEL));
        let google_calendar_id =
            env::var("GOOGLE_CALENDAR_ID").unwrap_or_else(|_| String::from(DEFAULT_CALENDAR_ID));
        let token_path =
            env::var("GOOGLE_TOKEN_PATH").unwrap_or_else(|_| String::from(DEFAULT_TOKEN_PATH));
        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));

        let mut config = Config {
            openai_api_key,
            openai_model,
            google_client_id,
            google_client_secret,
            google_calendar_id,
            token_path,
            timezone,
        };

        // File overrides win over environment defaults
        if let Ok(content) = fs::read_to_string("config/calpilot.toml") {
            if let Ok(overrides) = toml::from_str::<FileOverrides>(&content) {
                config.apply_overrides(overrides);
            }
        }

        // Fail early on a bad timezone instead of at the first command
        config.tz()?;

        Ok(config)
    }

    fn apply_overrides(&mut self, overrides: FileOverrides) {
        if let Some(model) = overrides.openai_model {
            self.openai_model = model;
        }
        if let Some(calendar_id) = overrides.google_calendar_id {
            self.google_calendar_id = calendar_id;
        }
        if let Some(token_path) = overrides.token_path {
            self.token_path = token_path;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = timezone;
        }
    }

    /// Parse the configured timezone
    pub fn tz(&self) -> AppResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }
}
