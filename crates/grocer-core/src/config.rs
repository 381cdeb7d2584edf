//! Configuration module
//!
//! Client configuration is read from the environment (a `.env` file is loaded
//! first when present). Every setting has a default so the client runs against
//! a local API without any setup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v0";
const DEFAULT_USERNAME: &str = "DemoUser";
const DEFAULT_SAVE_DIR: &str = "receipts";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_FILE_SIZE_MB: usize = 10;
const HEIC_JPEG_QUALITY: u8 = 80;

/// MIME types accepted for upload. `image/jpg` is a common non-standard alias.
pub const DEFAULT_ALLOWED_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "image/heic"];

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub username: String,
    pub request_timeout_secs: u64,
    /// Advisory only: shown to the user, never enforced.
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub heic_jpeg_quality: u8,
    pub save_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            username: DEFAULT_USERNAME.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            allowed_content_types: DEFAULT_ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            heic_jpeg_quality: HEIC_JPEG_QUALITY,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("GROCER_API_BASE_URL")
            .or_else(|| lookup("API_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let api_token = lookup("GROCER_API_TOKEN").filter(|t| !t.trim().is_empty());

        let username = lookup("GROCER_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        let request_timeout_secs = match lookup("GROCER_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("GROCER_REQUEST_TIMEOUT_SECS must be a valid number")
            })?,
            None => REQUEST_TIMEOUT_SECS,
        };

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);

        let allowed_content_types = lookup("ALLOWED_CONTENT_TYPES")
            .map(|s| {
                s.split(',')
                    .map(|ct| ct.trim().to_lowercase())
                    .filter(|ct| !ct.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| {
                DEFAULT_ALLOWED_CONTENT_TYPES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            });

        let heic_jpeg_quality = lookup("HEIC_JPEG_QUALITY")
            .and_then(|s| s.trim().parse::<u8>().ok())
            .unwrap_or(HEIC_JPEG_QUALITY);

        let save_dir = lookup("GROCER_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_DIR));

        let max_file_size_bytes = max_file_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| anyhow::anyhow!("MAX_FILE_SIZE_MB is too large"))?;

        let config = Config {
            api_base_url,
            api_token,
            username,
            request_timeout_secs,
            max_file_size_bytes,
            allowed_content_types,
            heic_jpeg_quality,
            save_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(anyhow::anyhow!(
                "GROCER_API_BASE_URL must start with http:// or https://, got '{}'",
                self.api_base_url
            ));
        }
        if self.username.trim().is_empty() {
            return Err(anyhow::anyhow!("GROCER_USERNAME cannot be empty"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "GROCER_REQUEST_TIMEOUT_SECS must be greater than 0"
            ));
        }
        if self.allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!("ALLOWED_CONTENT_TYPES cannot be empty"));
        }
        if self.heic_jpeg_quality == 0 || self.heic_jpeg_quality > 100 {
            return Err(anyhow::anyhow!("HEIC_JPEG_QUALITY must be between 1 and 100"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size_bytes / 1024 / 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000/api/v0");
        assert_eq!(config.username, "DemoUser");
        assert_eq!(config.api_token, None);
        assert_eq!(config.max_file_size_mb(), 10);
        assert_eq!(config.heic_jpeg_quality, 80);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(
            config.allowed_content_types,
            vec!["image/jpeg", "image/jpg", "image/png", "image/heic"]
        );
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let config = Config::from_lookup(lookup_from(&[
            ("GROCER_API_BASE_URL", "https://food.example.com/api/v0/"),
            ("GROCER_API_TOKEN", "secret"),
            ("GROCER_USERNAME", "alice"),
            ("ALLOWED_CONTENT_TYPES", "IMAGE/PNG, image/jpeg"),
            ("GROCER_SAVE_DIR", "/tmp/receipts"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://food.example.com/api/v0");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.username, "alice");
        assert_eq!(config.allowed_content_types, vec!["image/png", "image/jpeg"]);
        assert_eq!(config.save_dir, PathBuf::from("/tmp/receipts"));
    }

    #[test]
    fn test_fallback_base_url_key() {
        let config =
            Config::from_lookup(lookup_from(&[("API_BASE_URL", "http://10.0.0.2:8000")])).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.2:8000");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        assert!(
            Config::from_lookup(lookup_from(&[("GROCER_REQUEST_TIMEOUT_SECS", "soon")])).is_err()
        );
        assert!(Config::from_lookup(lookup_from(&[("GROCER_REQUEST_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("GROCER_API_BASE_URL", "localhost")])).is_err());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("GROCER_API_TOKEN", "  ")])).unwrap();
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_oversized_file_limit_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(
            "MAX_FILE_SIZE_MB",
            "18446744073709551615",
        )]))
        .unwrap_err();
        assert_eq!(err.to_string(), "MAX_FILE_SIZE_MB is too large");

        let config = Config::from_lookup(lookup_from(&[("MAX_FILE_SIZE_MB", "25")])).unwrap();
        assert_eq!(config.max_file_size_bytes, 25 * 1024 * 1024);
    }
}
