//! Cinemeta-compatible catalog client.
//!
//! Cinemeta is the public metadata catalog used by Stremio-style addons.
//! No API key is required and rate limits are generous.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::content::ContentType;

use super::types::{CatalogError, CatalogSource, Metadata};

const DEFAULT_BASE_URL: &str = "https://v3-cinemeta.strem.io";

/// Cinemeta catalog client.
pub struct CinemetaClient {
    client: Client,
    base_url: String,
}

impl CinemetaClient {
    /// Create a new Cinemeta client.
    pub fn new(config: CatalogConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CatalogSource for CinemetaClient {
    fn name(&self) -> &str {
        "cinemeta"
    }

    async fn meta(
        &self,
        content_type: ContentType,
        base_id: &str,
    ) -> Result<Metadata, CatalogError> {
        let url = format!(
            "{}/meta/{}/{}.json",
            self.base_url,
            content_type.as_str(),
            base_id
        );

        debug!(content_type = %content_type, base_id, "Catalog lookup");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                CatalogError::Timeout
            } else {
                CatalogError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == 404 {
            return Err(CatalogError::NotFound(base_id.to_string()));
        }
        if !status.is_success() {
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
            });
        }

        let body: MetaResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse meta response: {}", e))
        })?;

        match body.meta {
            Some(meta) => Ok(meta.into()),
            None => Err(CatalogError::NotFound(base_id.to_string())),
        }
    }
}

// ============================================================================
// Catalog API response types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct MetaResponse {
    meta: Option<MetaResult>,
}

#[derive(Debug, Deserialize)]
struct MetaResult {
    id: Option<String>,
    name: String,
    year: Option<String>,
}

impl From<MetaResult> for Metadata {
    fn from(r: MetaResult) -> Self {
        Self {
            id: r.id,
            name: r.name,
            year: r.year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_result_conversion() {
        let result = MetaResult {
            id: Some("tt0434665".to_string()),
            name: "Rome".to_string(),
            year: Some("2005".to_string()),
        };

        let meta: Metadata = result.into();
        assert_eq!(meta.id.as_deref(), Some("tt0434665"));
        assert_eq!(meta.name, "Rome");
    }

    #[test]
    fn test_meta_response_parsing() {
        let json = r#"{"meta": {"id": "tt1", "name": "Heat", "year": "1995", "poster": "x.jpg"}}"#;
        let parsed: MetaResponse = serde_json::from_str(json).unwrap();
        let meta = parsed.meta.unwrap();
        assert_eq!(meta.name, "Heat");
    }

    #[test]
    fn test_meta_response_null_meta() {
        let parsed: MetaResponse = serde_json::from_str(r#"{"meta": null}"#).unwrap();
        assert!(parsed.meta.is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = CinemetaClient::new(CatalogConfig {
            base_url: Some("http://localhost:9000/".to_string()),
            timeout_secs: 10,
        });
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
