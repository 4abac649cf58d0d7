//! Mock catalog source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, CatalogSource, Metadata};
use crate::content::ContentType;

/// Mock implementation of the `CatalogSource` trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable metadata per base id
/// - Track lookups for assertions
/// - Simulate failures (one-shot injected error)
pub struct MockCatalog {
    metas: Arc<RwLock<HashMap<String, Metadata>>>,
    next_error: Arc<RwLock<Option<CatalogError>>>,
    lookups: Arc<RwLock<Vec<(ContentType, String)>>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            metas: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            lookups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register metadata for a base id.
    pub async fn set_meta(&self, base_id: &str, meta: Metadata) {
        self.metas.write().await.insert(base_id.to_string(), meta);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Recorded lookups (type, base id).
    pub async fn recorded_lookups(&self) -> Vec<(ContentType, String)> {
        self.lookups.read().await.clone()
    }

    /// Number of lookups performed.
    pub async fn lookup_count(&self) -> usize {
        self.lookups.read().await.len()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn meta(
        &self,
        content_type: ContentType,
        base_id: &str,
    ) -> Result<Metadata, CatalogError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.lookups
            .write()
            .await
            .push((content_type, base_id.to_string()));

        self.metas
            .read()
            .await
            .get(base_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(base_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_lookup_and_recording() {
        let catalog = MockCatalog::new();
        catalog.set_meta("tt1", fixtures::metadata("Rome")).await;

        let meta = catalog.meta(ContentType::Series, "tt1").await.unwrap();
        assert_eq!(meta.name, "Rome");

        let lookups = catalog.recorded_lookups().await;
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].1, "tt1");
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let catalog = MockCatalog::new();
        let result = catalog.meta(ContentType::Movie, "tt0").await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let catalog = MockCatalog::new();
        catalog.set_meta("tt1", fixtures::metadata("Rome")).await;
        catalog.set_next_error(CatalogError::Timeout).await;

        assert!(catalog.meta(ContentType::Movie, "tt1").await.is_err());
        assert!(catalog.meta(ContentType::Movie, "tt1").await.is_ok());
    }
}
