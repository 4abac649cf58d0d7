//! Real-Debrid API client.
//!
//! Bearer-token authenticated REST API. Mutating calls are form-encoded
//! POSTs; the instant-availability endpoint takes hashes as path segments.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::config::DebridConfig;

use super::types::{
    AddedMagnet, DebridClient, DebridError, FileChoice, TorrentInfo, UnrestrictedLink,
};

const DEFAULT_BASE_URL: &str = "https://api.real-debrid.com/rest/1.0";

/// Real-Debrid API client.
pub struct RealDebridClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RealDebridClient {
    /// Create a new Real-Debrid client.
    pub fn new(config: DebridConfig) -> Result<Self, DebridError> {
        if config.api_token.is_empty() {
            return Err(DebridError::NotConfigured(
                "Real-Debrid API token is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| DebridError::ConnectionFailed(e.to_string()))?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: config.api_token,
        })
    }

    fn transport_error(e: reqwest::Error) -> DebridError {
        if e.is_timeout() {
            DebridError::Timeout
        } else {
            DebridError::ConnectionFailed(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, DebridError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DebridError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl DebridClient for RealDebridClient {
    fn name(&self) -> &str {
        "real-debrid"
    }

    async fn add_magnet(&self, magnet: &str) -> Result<AddedMagnet, DebridError> {
        debug!("Submitting magnet to debrid provider");

        let response = self
            .client
            .post(format!("{}/torrents/addMagnet", self.base_url))
            .bearer_auth(&self.token)
            .form(&[("magnet", magnet)])
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("addMagnet response: {}", e)))
    }

    async fn torrent_info(&self, torrent_id: &str) -> Result<TorrentInfo, DebridError> {
        let response = self
            .client
            .get(format!("{}/torrents/info/{}", self.base_url, torrent_id))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("torrent info response: {}", e)))
    }

    async fn select_files(
        &self,
        torrent_id: &str,
        choice: &FileChoice,
    ) -> Result<(), DebridError> {
        debug!(torrent_id, files = %choice.as_param(), "Selecting files");

        let response = self
            .client
            .post(format!(
                "{}/torrents/selectFiles/{}",
                self.base_url, torrent_id
            ))
            .bearer_auth(&self.token)
            .form(&[("files", choice.as_param())])
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn unrestrict_link(&self, link: &str) -> Result<UnrestrictedLink, DebridError> {
        let response = self
            .client
            .post(format!("{}/unrestrict/link", self.base_url))
            .bearer_auth(&self.token)
            .form(&[("link", link)])
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("unrestrict response: {}", e)))
    }

    async fn instant_availability(
        &self,
        hashes: &[String],
    ) -> Result<HashSet<String>, DebridError> {
        if hashes.is_empty() {
            return Ok(HashSet::new());
        }

        let path = hashes.join("/");
        let response = self
            .client
            .get(format!(
                "{}/torrents/instantAvailability/{}",
                self.base_url, path
            ))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let body: Value = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| DebridError::ParseError(format!("availability response: {}", e)))?;

        Ok(parse_available_hashes(&body, hashes))
    }
}

/// A hash is cached iff the provider returned a non-empty object for it.
fn parse_available_hashes(body: &Value, hashes: &[String]) -> HashSet<String> {
    hashes
        .iter()
        .filter(|hash| {
            body.get(hash.to_lowercase())
                .and_then(Value::as_object)
                .map(|obj| !obj.is_empty())
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hashes(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_requires_token() {
        let result = RealDebridClient::new(DebridConfig {
            api_token: String::new(),
            base_url: None,
            timeout_secs: 30,
        });
        assert!(matches!(result, Err(DebridError::NotConfigured(_))));
    }

    #[test]
    fn test_new_with_token() {
        let client = RealDebridClient::new(DebridConfig {
            api_token: "token".to_string(),
            base_url: Some("http://localhost:9999/".to_string()),
            timeout_secs: 30,
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
        assert_eq!(client.name(), "real-debrid");
    }

    #[test]
    fn test_parse_available_hashes_non_empty_object() {
        let body = json!({
            "aaa": {"rd": [{"1": {"filename": "f.mkv", "filesize": 1}}]},
            "bbb": {},
            "ccc": "string-shaped",
        });

        let cached = parse_available_hashes(&body, &hashes(&["aaa", "bbb", "ccc", "ddd"]));
        assert!(cached.contains("aaa"));
        assert!(!cached.contains("bbb"), "empty object is not cached");
        assert!(!cached.contains("ccc"), "non-object value is not cached");
        assert!(!cached.contains("ddd"), "absent hash is not cached");
    }

    #[test]
    fn test_parse_available_hashes_case_insensitive() {
        let body = json!({"aaa": {"rd": []}});
        let cached = parse_available_hashes(&body, &hashes(&["AAA"]));
        assert!(cached.contains("AAA"));
    }
}
