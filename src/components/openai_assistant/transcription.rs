use crate::config::Config;
use crate::error::{transcription_error, AppResult};
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::{info, warn};

/// OpenAI speech-to-text endpoint URL
pub const TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Speech-to-text model used for voice commands
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Response structure from the transcription service
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Turns recorded voice commands into text with OpenAI Whisper
pub struct WhisperTranscriber {
    client: Client,
    api_key: String,
}

impl WhisperTranscriber {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
        }
    }

    /// Transcribe an audio clip. Returns `None` when the service produced
    /// no usable text; transport and API errors are returned as errors.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> AppResult<Option<String>> {
        info!("Transcribing audio clip ({} bytes)", audio.len());

        let form = multipart::Form::new()
            .text("model", TRANSCRIPTION_MODEL)
            .text("response_format", "json")
            .part(
                "file",
                multipart::Part::bytes(audio)
                    .file_name(file_name.to_string())
                    .mime_str("audio/mpeg")
                    .map_err(|e| {
                        transcription_error(&format!("Failed to create multipart form: {}", e))
                    })?,
            );

        let response = self
            .client
            .post(TRANSCRIPTION_ENDPOINT)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| transcription_error(&format!("Transcription request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(transcription_error(&format!(
                "Transcription failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| transcription_error(&format!("Unexpected response format: {}", e)))?;

        match parsed.text {
            Some(text) if !text.trim().is_empty() => Ok(Some(text)),
            _ => {
                warn!("Transcription returned no text");
                Ok(None)
            }
        }
    }
}
