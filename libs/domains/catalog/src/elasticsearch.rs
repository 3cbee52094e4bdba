//! Search index gateway over the Elasticsearch REST API

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::ElasticsearchConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::index::{IndexPage, IndexQuery, SearchIndex};
use crate::models::SearchDocument;

#[derive(Clone)]
pub struct ElasticsearchGateway {
    client: reqwest::Client,
    base_url: String,
    index: String,
}

impl ElasticsearchGateway {
    pub fn new(config: &ElasticsearchConfig) -> CatalogResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| CatalogError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Create the index with its mapping unless it already exists
    #[instrument(skip(self), fields(index = %self.index))]
    pub async fn ensure_index(&self) -> CatalogResult<()> {
        let url = self.url(&self.index);

        let exists = self.client.head(&url).send().await?;
        match exists.status() {
            status if status.is_success() => {
                debug!("Search index already exists");
                return Ok(());
            }
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(CatalogError::SearchEngineUnavailable(format!(
                    "index existence check returned {}",
                    status
                )));
            }
        }

        let response = self.client.put(&url).json(&index_mapping()).send().await?;
        let status = response.status();
        if status.is_success() {
            info!("Created search index");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        // Another instance created it between HEAD and PUT
        if status == StatusCode::BAD_REQUEST && body.contains("resource_already_exists_exception") {
            return Ok(());
        }

        Err(CatalogError::SearchEngineUnavailable(format!(
            "index creation returned {}: {}",
            status, body
        )))
    }

    /// Index documents by id; re-indexing a document replaces it
    #[instrument(skip(self, documents), fields(index = %self.index, count = documents.len()))]
    pub async fn index_documents(&self, documents: &[SearchDocument]) -> CatalogResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let body = build_bulk_body(&self.index, documents)?;
        let response = self
            .client
            .post(self.url("_bulk"))
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        let response = ensure_success(response, "bulk index").await?;

        let summary: BulkSummary = response.json().await?;
        if summary.errors {
            let failed = summary
                .items
                .iter()
                .filter(|item| item.pointer("/index/error").is_some())
                .count();
            warn!(failed, "Bulk indexing rejected documents");
            return Err(CatalogError::SearchEngineUnavailable(format!(
                "{} of {} documents were rejected",
                failed,
                documents.len()
            )));
        }

        info!("Indexed documents");
        Ok(())
    }

    /// Connectivity probe
    pub async fn ping(&self) -> CatalogResult<()> {
        let response = self.client.get(self.url("")).send().await?;
        ensure_success(response, "ping").await?;
        Ok(())
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchGateway {
    #[instrument(skip(self, query), fields(index = %self.index, skip = query.skip, limit = query.limit))]
    async fn search(&self, query: IndexQuery) -> CatalogResult<IndexPage> {
        let body = build_search_body(&query);
        let response = self
            .client
            .post(self.url(&format!("{}/_search", self.index)))
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response, "search").await?;

        let bytes = response.bytes().await?;
        let page = parse_search_response(&bytes, query.skip, query.limit)?;
        debug!(total = page.total, returned = page.ids.len(), "Search completed");
        Ok(page)
    }
}

async fn ensure_success(
    response: reqwest::Response,
    operation: &str,
) -> CatalogResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%status, operation, "Search engine request failed");
    Err(CatalogError::SearchEngineUnavailable(format!(
        "{} returned {}: {}",
        operation, status, body
    )))
}

/// Request body for a ranked, filtered, exactly-counted search
pub fn build_search_body(query: &IndexQuery) -> Value {
    let must: Vec<Value> = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| json!({ "match": { "search_text": text } }))
        .into_iter()
        .collect();

    let filter: Vec<Value> = query
        .filters
        .iter()
        .map(|(attribute, value)| {
            let mut term = serde_json::Map::new();
            term.insert(format!("attributes.{}", attribute), Value::from(value));
            json!({ "term": Value::Object(term) })
        })
        .collect();

    let mut body = json!({
        "from": query.skip,
        "size": query.limit,
        "query": { "bool": { "must": must, "filter": filter } },
        "sort": [{ "total_sold": { "order": "desc" } }],
        "track_total_hits": true,
    });

    if let Some(fields) = &query.fields {
        body["_source"] = json!(fields);
    }

    body
}

#[derive(Deserialize)]
struct SearchBody {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    total: TotalHits,
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Relation { value: u64 },
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id")]
    id: Option<String>,
    #[serde(rename = "_source")]
    source: Option<HitSource>,
}

#[derive(Deserialize)]
struct HitSource {
    id: Option<Value>,
}

impl Hit {
    fn variant_id(&self) -> Option<Uuid> {
        let raw = self
            .source
            .as_ref()
            .and_then(|source| source.id.as_ref())
            .and_then(Value::as_str)
            .or(self.id.as_deref())?;

        match Uuid::parse_str(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(id = raw, "Dropping search hit with a non-UUID identifier");
                None
            }
        }
    }
}

/// Extract ranked ids and the total from a `_search` response
pub fn parse_search_response(body: &[u8], skip: u64, limit: u64) -> CatalogResult<IndexPage> {
    let parsed: SearchBody = serde_json::from_slice(body).map_err(|e| {
        CatalogError::SearchEngineUnavailable(format!("undecodable search response: {}", e))
    })?;

    let total = match parsed.hits.total {
        TotalHits::Count(value) | TotalHits::Relation { value } => value,
    };
    let ids = parsed.hits.hits.iter().filter_map(Hit::variant_id).collect();

    Ok(IndexPage {
        ids,
        total,
        skip,
        limit,
    })
}

/// Index settings: whitespace-analyzed `search_text`, keyword attributes for
/// exact `term` filters, numeric `total_sold` for sorting
pub fn index_mapping() -> Value {
    json!({
        "mappings": {
            "dynamic_templates": [{
                "attribute_strings": {
                    "path_match": "attributes.*",
                    "match_mapping_type": "string",
                    "mapping": { "type": "keyword" }
                }
            }],
            "properties": {
                "id": { "type": "keyword" },
                "search_text": { "type": "text", "analyzer": "whitespace" },
                "attributes": { "type": "object", "dynamic": true },
                "total_sold": { "type": "long" }
            }
        }
    })
}

/// NDJSON body of a `_bulk` request: one `index` action per document
pub fn build_bulk_body(index: &str, documents: &[SearchDocument]) -> CatalogResult<String> {
    let mut body = String::new();
    for document in documents {
        let action = json!({ "index": { "_index": index, "_id": document.id } });
        let source = serde_json::to_string(document)
            .map_err(|e| CatalogError::Internal(format!("Failed to encode document: {}", e)))?;

        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&source);
        body.push('\n');
    }
    Ok(body)
}

#[derive(Deserialize)]
struct BulkSummary {
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}
