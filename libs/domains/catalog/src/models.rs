use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_LIMIT: i64 = 50;

/// Scalar value of a variant attribute (`color`, `size`, `weight`, ...)
///
/// Serialized untagged, so documents and cache entries carry plain JSON
/// strings and numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl AttributeValue {
    /// Interpret a raw query-string value: integers first, then finite
    /// floats, everything else stays a string.
    ///
    /// A number is only inferred when it formats back to exactly `raw`, so
    /// codes like `007` or `1e3` keep matching their stored string form.
    pub fn infer(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(value) if value.to_string() == raw => return Self::Integer(value),
            _ => {}
        }
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value.to_string() == raw => Self::Float(value),
            _ => Self::String(raw.to_string()),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(value),
        }
    }
}

impl From<&AttributeValue> for serde_json::Value {
    fn from(value: &AttributeValue) -> Self {
        match value {
            AttributeValue::Integer(v) => serde_json::Value::from(*v),
            AttributeValue::Float(v) => serde_json::Value::from(*v),
            AttributeValue::String(v) => serde_json::Value::from(v.as_str()),
        }
    }
}

pub type Attributes = BTreeMap<String, AttributeValue>;

/// A sellable product variant, as stored in the system of record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Variant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub category_id: Uuid,
    #[schema(value_type = Object)]
    pub attributes: Attributes,
    /// Price in minor currency units (cents)
    pub price: i64,
    pub stock: i32,
    pub sku: String,
    pub total_sold: i64,
}

impl Variant {
    /// Cache key of this record: the hyphenated identifier
    pub fn cache_key(&self) -> String {
        self.id.to_string()
    }
}

/// Index-side projection of a [`Variant`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: Uuid,
    pub search_text: String,
    pub attributes: Attributes,
    pub total_sold: i64,
}

impl SearchDocument {
    /// Build the document for `variant`; `search_text` is the lower-cased
    /// product name followed by every attribute value in key order.
    pub fn from_variant(variant: &Variant, product_name: &str) -> Self {
        let mut search_text = product_name.to_string();
        for value in variant.attributes.values() {
            search_text.push(' ');
            search_text.push_str(&value.to_string());
        }

        Self {
            id: variant.id,
            search_text: search_text.to_lowercase(),
            attributes: variant.attributes.clone(),
            total_sold: variant.total_sold,
        }
    }
}

/// A present cache entry
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    Record(Variant),
    /// Present but not a variant: the parsed JSON, or the raw text when the
    /// payload is not JSON at all
    Degraded(serde_json::Value),
}

impl CachedValue {
    pub fn parse(raw: &[u8]) -> Self {
        if let Ok(variant) = serde_json::from_slice::<Variant>(raw) {
            return Self::Record(variant);
        }
        match serde_json::from_slice::<serde_json::Value>(raw) {
            Ok(value) => Self::Degraded(value),
            Err(_) => Self::Degraded(serde_json::Value::String(
                String::from_utf8_lossy(raw).into_owned(),
            )),
        }
    }
}

/// One element of a search response page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum HydratedVariant {
    Record(Variant),
    /// Cached payload that is not a variant record, passed through unchanged
    Raw(serde_json::Value),
}

impl From<CachedValue> for HydratedVariant {
    fn from(value: CachedValue) -> Self {
        match value {
            CachedValue::Record(variant) => Self::Record(variant),
            CachedValue::Degraded(raw) => Self::Raw(raw),
        }
    }
}

impl HydratedVariant {
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Self::Record(variant) => Some(variant.id),
            Self::Raw(_) => None,
        }
    }
}

/// Input of a catalog search
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchRequest {
    #[validate(
        required(message = "query is required"),
        custom(function = "not_blank")
    )]
    pub query: Option<String>,
    /// Exact-match attribute filters, ANDed together
    pub filter: Attributes,
    #[validate(range(min = 0, message = "skip must not be negative"))]
    pub skip: i64,
    #[validate(range(min = 1, message = "limit must be positive"))]
    pub limit: i64,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: None,
            filter: Attributes::new(),
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.filter.insert(attribute.into(), value);
        self
    }

    pub fn with_page(mut self, skip: i64, limit: i64) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }

    /// The query as sent to the index: lower-cased
    pub fn normalized_query(&self) -> Option<String> {
        self.query.as_deref().map(str::to_lowercase)
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("query must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Query-string parameters of `GET /products/search`
///
/// Attribute filters use bracket notation, e.g. `filter[color]=red`.
#[derive(Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query, required and non-empty
    pub query: String,
    /// Number of ranked results to skip (default 0)
    pub skip: Option<i64>,
    /// Page size, at least 1 (default 50)
    pub limit: Option<i64>,
}

/// A page of hydrated search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Total matches in the index, independent of pagination
    pub total: u64,
    pub products: Vec<HydratedVariant>,
    pub skip: u64,
    pub limit: u64,
}

/// Non-fatal failure observed while serving a search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// A cache entry was present but did not parse as a variant
    CacheReadDegraded { key: String },
    /// The cache could not be read; every id was hydrated from the store
    CacheReadUnavailable { reason: String },
    /// Fetched records could not be written back to the cache
    CacheWriteFailed { records: usize, reason: String },
}

/// Search result plus the advisories raised while producing it
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub advisories: Vec<Advisory>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant() -> Variant {
        let mut attributes = Attributes::new();
        attributes.insert("color".into(), AttributeValue::String("Red".into()));
        attributes.insert("size".into(), AttributeValue::Integer(42));

        Variant {
            id: Uuid::from_u128(1),
            product_id: Uuid::from_u128(10),
            supplier_id: Uuid::from_u128(20),
            category_id: Uuid::from_u128(30),
            attributes,
            price: 1999,
            stock: 5,
            sku: "SKU-1".into(),
            total_sold: 12,
        }
    }

    #[test]
    fn test_attribute_value_inference() {
        assert_eq!(AttributeValue::infer("42"), AttributeValue::Integer(42));
        assert_eq!(AttributeValue::infer("-3"), AttributeValue::Integer(-3));
        assert_eq!(AttributeValue::infer("2.5"), AttributeValue::Float(2.5));
        assert_eq!(
            AttributeValue::infer("red"),
            AttributeValue::String("red".into())
        );
        assert_eq!(
            AttributeValue::infer("NaN"),
            AttributeValue::String("NaN".into())
        );
        for code in ["007", "+5", "1e3", "0.50", "-0"] {
            assert_eq!(AttributeValue::infer(code), AttributeValue::String(code.into()));
        }
    }

    #[test]
    fn test_attribute_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            AttributeValue::Integer(1),
            AttributeValue::Float(1.5),
            AttributeValue::String("x".into()),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,1.5,"x"]"#);

        let parsed: Vec<AttributeValue> = serde_json::from_str("[7, 0.25, \"m\"]").unwrap();
        assert_eq!(parsed[0], AttributeValue::Integer(7));
        assert_eq!(parsed[1], AttributeValue::Float(0.25));
        assert_eq!(parsed[2], AttributeValue::String("m".into()));
    }

    #[test]
    fn test_search_document_text() {
        let document = SearchDocument::from_variant(&variant(), "Running Shoe");
        assert_eq!(document.id, Uuid::from_u128(1));
        assert_eq!(document.search_text, "running shoe red 42");
        assert_eq!(document.total_sold, 12);
    }

    #[test]
    fn test_cached_value_parse() {
        let raw = serde_json::to_vec(&variant()).unwrap();
        assert_eq!(CachedValue::parse(&raw), CachedValue::Record(variant()));

        assert_eq!(
            CachedValue::parse(br#"{"legacy":true}"#),
            CachedValue::Degraded(serde_json::json!({"legacy": true}))
        );
        assert_eq!(
            CachedValue::parse(b"not json"),
            CachedValue::Degraded(serde_json::Value::String("not json".into()))
        );
    }

    #[test]
    fn test_search_request_validation() {
        assert!(SearchRequest::new("shoe").validate().is_ok());

        let errors = SearchRequest::default().validate().unwrap_err();
        assert!(errors.field_errors().contains_key("query"));

        let errors = SearchRequest::new("   ").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("query"));

        let errors = SearchRequest::new("shoe")
            .with_page(-1, 0)
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("skip"));
        assert!(fields.contains_key("limit"));

        assert!(
            SearchRequest::new("shoe")
                .with_page(0, 2000)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_advisory_serialization() {
        let advisory = Advisory::CacheWriteFailed {
            records: 2,
            reason: "timeout".into(),
        };
        assert_eq!(
            serde_json::to_value(&advisory).unwrap(),
            serde_json::json!({"kind": "cache_write_failed", "records": 2, "reason": "timeout"})
        );
    }
}
