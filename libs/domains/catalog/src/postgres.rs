use async_trait::async_trait;
use sea_orm::sea_query::{CaseStatement, SimpleExpr};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use crate::entity;
use crate::error::CatalogResult;
use crate::models::Variant;
use crate::repository::VariantRepository;

/// PostgreSQL implementation of [`VariantRepository`]
#[derive(Clone)]
pub struct PgVariantRepository {
    db: DatabaseConnection,
}

impl PgVariantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `CASE id WHEN $1 THEN 0 WHEN $2 THEN 1 ... END`
fn rank_order(ids: &[Uuid]) -> SimpleExpr {
    let mut case = CaseStatement::new();
    for (position, id) in ids.iter().enumerate() {
        case = case.case(entity::Column::Id.eq(*id), position as i64);
    }
    SimpleExpr::Case(Box::new(case))
}

#[async_trait]
impl VariantRepository for PgVariantRepository {
    #[instrument(skip(self, ids), fields(ids = ids.len()))]
    async fn fetch_by_ids(&self, ids: &[Uuid]) -> CatalogResult<Vec<Variant>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids.iter().copied()))
            .order_by(rank_order(ids), Order::Asc)
            .all(&self.db)
            .await?;

        models.into_iter().map(Variant::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeValue;
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait};

    #[test]
    fn test_rank_order_maps_each_id_to_its_position() {
        let ids = [Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)];
        let sql = entity::Entity::find()
            .filter(entity::Column::Id.is_in(ids.iter().copied()))
            .order_by(rank_order(&ids), Order::Asc)
            .build(DatabaseBackend::Postgres)
            .to_string();

        let order_by = &sql[sql.find("ORDER BY").unwrap()..];
        assert!(order_by.starts_with("ORDER BY CASE WHEN"), "{}", sql);

        let mut last = 0;
        for (position, id) in ids.iter().enumerate() {
            let arm = format!("= '{}' THEN {}", id, position);
            let at = order_by
                .find(&arm)
                .unwrap_or_else(|| panic!("missing `{}` in {}", arm, sql));
            assert!(at >= last, "arms out of order in {}", sql);
            last = at;
        }
    }

    #[tokio::test]
    async fn test_empty_ids_skip_the_query() {
        // No results queued: any query would fail
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgVariantRepository::new(db);
        assert!(repo.fetch_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rows_map_to_variants() {
        let rows = vec![
            entity::Model {
                id: Uuid::from_u128(2),
                product_id: Uuid::from_u128(10),
                supplier_id: Uuid::from_u128(20),
                category_id: Uuid::from_u128(30),
                attributes: serde_json::json!({"color": "red"}),
                price: 1000,
                stock: 1,
                sku: "SKU-2".into(),
                total_sold: 5,
            },
            entity::Model {
                id: Uuid::from_u128(1),
                product_id: Uuid::from_u128(10),
                supplier_id: Uuid::from_u128(20),
                category_id: Uuid::from_u128(30),
                attributes: serde_json::json!({}),
                price: 900,
                stock: 0,
                sku: "SKU-1".into(),
                total_sold: 7,
            },
        ];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([rows])
            .into_connection();
        let repo = PgVariantRepository::new(db);

        let fetched = repo
            .fetch_by_ids(&[Uuid::from_u128(2), Uuid::from_u128(1)])
            .await
            .unwrap();

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].sku, "SKU-2");
        assert_eq!(
            fetched[0].attributes.get("color"),
            Some(&AttributeValue::String("red".into()))
        );
        assert_eq!(fetched[0].price, 1000);
        assert!(fetched[1].attributes.is_empty());
        assert_eq!(fetched[1].total_sold, 7);
    }
}
