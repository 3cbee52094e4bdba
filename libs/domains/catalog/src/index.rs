use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::Attributes;

/// A ranked-id query against the search index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexQuery {
    /// Free text matched against `search_text`; `None` or blank matches everything
    pub text: Option<String>,
    /// Exact-match attribute filters, ANDed
    pub filters: Attributes,
    pub skip: u64,
    pub limit: u64,
    /// Source fields to return; the hydration pipeline only needs `id`
    pub fields: Option<Vec<String>>,
}

/// One ranked page of identifiers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexPage {
    pub ids: Vec<Uuid>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// Source of ranked variant identifiers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(&self, query: IndexQuery) -> CatalogResult<IndexPage>;
}
