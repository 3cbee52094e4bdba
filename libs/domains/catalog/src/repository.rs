use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::Variant;

/// System of record for variants
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VariantRepository: Send + Sync {
    /// Fetch variants in exactly the order of `ids`; unknown ids are omitted
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> CatalogResult<Vec<Variant>>;
}

/// In-memory implementation for development and tests
#[derive(Clone, Default)]
pub struct InMemoryVariantRepository {
    variants: Arc<RwLock<HashMap<Uuid, Variant>>>,
}

impl InMemoryVariantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, variant: Variant) {
        self.variants.write().await.insert(variant.id, variant);
    }

    pub async fn len(&self) -> usize {
        self.variants.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.variants.read().await.is_empty()
    }
}

#[async_trait]
impl VariantRepository for InMemoryVariantRepository {
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> CatalogResult<Vec<Variant>> {
        let variants = self.variants.read().await;
        Ok(ids.iter().filter_map(|id| variants.get(id).cloned()).collect())
    }
}
