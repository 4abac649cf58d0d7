//! Types for the metadata catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentType;

/// Canonical metadata for a title.
///
/// Only the fields the pipeline reads; everything else in the catalog
/// payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Catalog id, when echoed back by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Canonical title name.
    pub name: String,
    /// Release year or range (e.g. "1999", "2005-2013").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

/// Errors that can occur during catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Catalog API error: HTTP {status}")]
    ApiError { status: u16 },

    #[error("Title not found: {0}")]
    NotFound(String),

    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    #[error("Request timeout")]
    Timeout,
}

/// Trait for metadata catalog backends.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch metadata for a base content id (episode suffix already
    /// stripped by the caller).
    async fn meta(
        &self,
        content_type: ContentType,
        base_id: &str,
    ) -> Result<Metadata, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_serialization() {
        let meta = Metadata {
            id: Some("tt0434665".to_string()),
            name: "Rome".to_string(),
            year: Some("2005-2007".to_string()),
        };

        let json = serde_json::to_string(&meta).unwrap();
        let parsed: Metadata = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.name, "Rome");
        assert_eq!(parsed.year.as_deref(), Some("2005-2007"));
    }

    #[test]
    fn test_metadata_optional_fields() {
        let parsed: Metadata = serde_json::from_str(r#"{"name": "Heat"}"#).unwrap();
        assert_eq!(parsed.name, "Heat");
        assert!(parsed.id.is_none());
        assert!(parsed.year.is_none());
    }
}
