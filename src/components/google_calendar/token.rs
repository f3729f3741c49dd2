use crate::config::Config;
use crate::error::{google_calendar_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Google OAuth token endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Manages the stored Google OAuth token: loads it from the token file,
/// refreshes it when expired and writes the refreshed token back.
/// Obtaining the initial token (consent flow) happens out of band.
#[derive(Clone)]
pub struct TokenManager {
    config: Arc<RwLock<Config>>,
    client: Client,
}

impl TokenManager {
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Get a valid OAuth token, refreshing it if expired
    pub async fn get_token(&self) -> AppResult<Value> {
        let token_path = {
            let config_read = self.config.read().await;
            config_read.token_path.clone()
        };

        let token_str = fs::read_to_string(&token_path).await.map_err(|e| {
            google_calendar_error(&format!(
                "Failed to read token file {}: {}. Provision it with a valid Google OAuth token.",
                token_path, e
            ))
        })?;

        let token: Value = serde_json::from_str(&token_str)
            .map_err(|e| google_calendar_error(&format!("Failed to parse token JSON: {}", e)))?;

        if let Some(expiry) = token.get("expires_at").and_then(|v| v.as_i64()) {
            let now = Utc::now().timestamp();
            if expiry > now {
                return Ok(token);
            }
            // Token is expired, refresh it
            return self.refresh_token(&token, &token_path).await;
        }

        // No expiry recorded; treat as stale and refresh
        self.refresh_token(&token, &token_path).await
    }

    /// Refresh an expired token and persist the result
    async fn refresh_token(&self, token: &Value, token_path: &str) -> AppResult<Value> {
        let refresh_token = token
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| google_calendar_error("No refresh token in token data"))?;

        let (client_id, client_secret) = {
            let config_read = self.config.read().await;
            (
                config_read.google_client_id.clone(),
                config_read.google_client_secret.clone(),
            )
        };

        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token.to_string()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_ENDPOINT)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: Value = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let access_token = new_token
            .get("access_token")
            .cloned()
            .ok_or_else(|| google_calendar_error("Token response missing 'access_token' field"))?;

        // Combine new access token with the existing refresh token
        let expires_in = new_token
            .get("expires_in")
            .and_then(|v| v.as_i64())
            .unwrap_or(3600);
        let token_json = json!({
            "access_token": access_token,
            "refresh_token": refresh_token,
            "expires_at": Utc::now().timestamp() + expires_in,
        });

        self.save_token(&token_json, token_path).await?;

        Ok(token_json)
    }

    /// Write a token to the token file
    async fn save_token(&self, token_json: &Value, token_path: &str) -> AppResult<()> {
        if let Some(parent) = Path::new(token_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(token_path, token_json.to_string())
            .await
            .map_err(|e| {
                google_calendar_error(&format!(
                    "Failed to save token to {}: {}",
                    token_path, e
                ))
            })?;

        Ok(())
    }
}
