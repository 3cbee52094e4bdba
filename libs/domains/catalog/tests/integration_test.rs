//! Integration tests for the catalog domain
//!
//! These run against real PostgreSQL and Redis via testcontainers to ensure:
//! - the store returns rows in the requested rank order
//! - the cache layer round-trips records with a TTL in one batch
//! - the full pipeline hydrates from the store and then from the cache

use async_trait::async_trait;
use domain_catalog::*;
use redis::AsyncCommands;
use sea_orm::{ActiveModelTrait, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;
use test_utils::{TestDataBuilder, TestDatabase, TestRedis, assertions::*};
use uuid::Uuid;

fn variant(data: &TestDataBuilder, n: u64) -> Variant {
    let mut attributes = Attributes::new();
    attributes.insert("color".into(), AttributeValue::String("blue".into()));
    attributes.insert("weight".into(), AttributeValue::Float(0.5 * n as f64));

    Variant {
        id: data.uuid("variant", n),
        product_id: data.uuid("product", 1),
        supplier_id: data.uuid("supplier", 1),
        category_id: data.uuid("category", 1),
        attributes,
        price: 1500 + n as i64,
        stock: n as i32,
        sku: data.sku(n),
        total_sold: n as i64,
    }
}

async fn seed(db: &DatabaseConnection, variants: &[Variant]) {
    for v in variants {
        entity::ActiveModel::from(v).insert(db).await.unwrap();
    }
}

// ============================================================================
// Store
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_fetch_by_ids_preserves_requested_order() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("pg_rank_order");
    let variants: Vec<_> = (1..=4).map(|n| variant(&data, n)).collect();
    seed(&db.connection, &variants).await;

    let repo = PgVariantRepository::new(db.connection.clone());
    let requested = vec![variants[3].id, variants[0].id, variants[2].id, variants[1].id];
    let fetched = repo.fetch_by_ids(&requested).await.unwrap();

    let ids: Vec<_> = fetched.iter().map(|v| v.id).collect();
    assert_ids_in_order(&ids, &requested, "store order");
    assert_eq!(fetched[1], variants[0]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_fetch_by_ids_omits_unknown_rows() {
    let db = TestDatabase::new().await;
    let data = TestDataBuilder::from_test_name("pg_unknown_rows");
    let variants: Vec<_> = (1..=2).map(|n| variant(&data, n)).collect();
    seed(&db.connection, &variants).await;

    let repo = PgVariantRepository::new(db.connection.clone());
    let unknown = Uuid::now_v7();
    let requested = vec![variants[1].id, unknown, variants[0].id];
    let fetched = repo.fetch_by_ids(&requested).await.unwrap();

    let ids: Vec<_> = fetched.iter().map(|v| v.id).collect();
    assert_preserves_relative_order(&ids, &requested, "gap in store");
    assert_eq!(ids.len(), 2);
}

// ============================================================================
// Cache
// ============================================================================

#[tokio::test]
#[ignore] // Requires Docker
async fn test_cache_batch_round_trip() {
    let redis = TestRedis::new().await;
    let cache = RedisCache::new(redis.connection_manager(), Duration::from_secs(5));
    let data = TestDataBuilder::from_test_name("cache_round_trip");
    let variants: Vec<_> = (1..=3).map(|n| variant(&data, n)).collect();

    cache.batch_set(&variants[..2], 60).await.unwrap();

    let keys: Vec<String> = variants.iter().map(Variant::cache_key).collect();
    let found = cache.batch_get(&keys).await.unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(
        found[&keys[0]],
        Some(CachedValue::Record(variants[0].clone()))
    );
    assert_eq!(found[&keys[2]], None);
    assert!(cache.exists(&keys[1]).await.unwrap());
    assert!(!cache.exists(&keys[2]).await.unwrap());

    let mut conn = redis.connection_manager();
    let ttl: i64 = conn.ttl(&keys[0]).await.unwrap();
    assert!(ttl > 0 && ttl <= 60, "unexpected ttl {}", ttl);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_cache_passes_through_foreign_values() {
    let redis = TestRedis::new().await;
    let cache = RedisCache::new(redis.connection_manager(), Duration::from_secs(5));

    let mut conn = redis.connection_manager();
    conn.set::<_, _, ()>("legacy", "plain text").await.unwrap();
    conn.set::<_, _, ()>("shaped", r#"{"v":1}"#).await.unwrap();

    let found = cache
        .get_batch(&["legacy".to_string(), "shaped".to_string()])
        .await
        .unwrap();

    assert_eq!(
        found["legacy"],
        Some(CachedValue::Degraded(serde_json::Value::String(
            "plain text".into()
        )))
    );
    assert_eq!(
        found["shaped"],
        Some(CachedValue::Degraded(serde_json::json!({"v": 1})))
    );
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_cache_empty_inputs_short_circuit() {
    let redis = TestRedis::new().await;
    let cache = RedisCache::new(redis.connection_manager(), Duration::from_secs(5));

    assert!(cache.get_batch(&[]).await.unwrap().is_empty());
    cache
        .set_batch(&Vec::<Variant>::new(), Variant::cache_key, 60)
        .await
        .unwrap();
}

// ============================================================================
// Pipeline
// ============================================================================

struct RankedIds(Vec<Uuid>);

#[async_trait]
impl SearchIndex for RankedIds {
    async fn search(&self, query: IndexQuery) -> CatalogResult<IndexPage> {
        Ok(IndexPage {
            ids: self.0.clone(),
            total: self.0.len() as u64,
            skip: query.skip,
            limit: query.limit,
        })
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_pipeline_populates_cache_from_store() {
    let db = TestDatabase::new().await;
    let redis = TestRedis::new().await;
    let data = TestDataBuilder::from_test_name("pipeline_populates");
    let variants: Vec<_> = (1..=3).map(|n| variant(&data, n)).collect();
    seed(&db.connection, &variants).await;

    let ranking = vec![variants[2].id, variants[0].id, variants[1].id];
    let cache = Arc::new(RedisCache::new(
        redis.connection_manager(),
        Duration::from_secs(5),
    ));
    let service = CatalogSearchService::new(
        Arc::new(RankedIds(ranking.clone())),
        Arc::clone(&cache),
        Arc::new(PgVariantRepository::new(db.connection.clone())),
        60,
    );

    let outcome = service.search(SearchRequest::new("blue")).await.unwrap();
    let ids: Vec<_> = outcome
        .response
        .products
        .iter()
        .filter_map(HydratedVariant::id)
        .collect();
    assert_ids_in_order(&ids, &ranking, "cold pipeline");
    assert!(outcome.advisories.is_empty());

    for id in &ranking {
        assert!(cache.exists(&id.to_string()).await.unwrap());
    }

    let warm = service.search(SearchRequest::new("blue")).await.unwrap();
    assert_eq!(warm.response, outcome.response);
}
