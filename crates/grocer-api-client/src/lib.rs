//! HTTP client for the receipt parsing API.
//!
//! Provides a minimal client with optional Bearer auth, generic GET/POST
//! helpers, and the domain methods in [`api`]. The CLI uses this client as its
//! [`grocer_core::ReceiptParser`].

pub mod api;

use anyhow::{Context, Result};
use grocer_core::case::snake_case_keys;
use grocer_core::{AppError, Config};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// No credentials; the demo backend accepts anonymous uploads.
    None,
}

/// HTTP client for the parsing API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create client from configuration: base URL, optional bearer token and timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let auth = match &config.api_token {
            Some(token) => Auth::Bearer(token.clone()),
            None => Auth::None,
        };
        Self::new(config.api_base_url.clone(), auth, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::None => request,
        }
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url));
        self.send(request).await
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, AppError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form));
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, AppError> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ApiStatus {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            AppError::InvalidResponse(format!("Failed to parse response as JSON: {}", e))
        })?;

        // Accept camelCase keys as well as the documented snake_case.
        serde_json::from_value(snake_case_keys(value)).map_err(|e| {
            AppError::InvalidResponse(format!("Unexpected response shape: {}", e))
        })
    }
}

pub use api::{FormValue, StatusResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new(
            "http://localhost:8000/api/v0/".to_string(),
            Auth::None,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api/v0");
        assert_eq!(
            client.build_url("/grocery_receipt"),
            "http://localhost:8000/api/v0/grocery_receipt"
        );
    }

    #[test]
    fn test_from_config_uses_token() {
        let config = Config {
            api_token: Some("secret".to_string()),
            ..Config::default()
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert!(matches!(client.auth, Auth::Bearer(ref t) if t == "secret"));
        assert_eq!(client.base_url(), "http://localhost:8000/api/v0");
    }
}
