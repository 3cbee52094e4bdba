use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::error::CatalogError;
use crate::models::Variant;

/// Sea-ORM entity for the `variants` table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub supplier_id: Uuid,
    pub category_id: Uuid,
    #[sea_orm(column_type = "JsonBinary")]
    pub attributes: Json,
    pub price: i64,
    pub stock: i32,
    #[sea_orm(column_type = "Text", unique)]
    pub sku: String,
    pub total_sold: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Variant {
    type Error = CatalogError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let attributes = serde_json::from_value(model.attributes).map_err(|e| {
            CatalogError::Internal(format!(
                "variant {} has non-scalar attributes: {}",
                model.id, e
            ))
        })?;

        Ok(Self {
            id: model.id,
            product_id: model.product_id,
            supplier_id: model.supplier_id,
            category_id: model.category_id,
            attributes,
            price: model.price,
            stock: model.stock,
            sku: model.sku,
            total_sold: model.total_sold,
        })
    }
}

// Used by loaders and tests to seed the table
impl From<&Variant> for ActiveModel {
    fn from(variant: &Variant) -> Self {
        let attributes = variant
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
            .collect::<serde_json::Map<_, _>>();

        Self {
            id: Set(variant.id),
            product_id: Set(variant.product_id),
            supplier_id: Set(variant.supplier_id),
            category_id: Set(variant.category_id),
            attributes: Set(serde_json::Value::Object(attributes)),
            price: Set(variant.price),
            stock: Set(variant.stock),
            sku: Set(variant.sku.clone()),
            total_sold: Set(variant.total_sold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttributeValue;

    fn model(attributes: Json) -> Model {
        Model {
            id: Uuid::from_u128(1),
            product_id: Uuid::from_u128(2),
            supplier_id: Uuid::from_u128(3),
            category_id: Uuid::from_u128(4),
            attributes,
            price: 2500,
            stock: 3,
            sku: "SKU-1".into(),
            total_sold: 9,
        }
    }

    #[test]
    fn test_model_into_variant() {
        let variant =
            Variant::try_from(model(serde_json::json!({"color": "blue", "size": 40}))).unwrap();

        assert_eq!(variant.price, 2500);
        assert_eq!(
            variant.attributes.get("color"),
            Some(&AttributeValue::String("blue".into()))
        );
        assert_eq!(
            variant.attributes.get("size"),
            Some(&AttributeValue::Integer(40))
        );
    }

    #[test]
    fn test_nested_attributes_are_rejected() {
        let result = Variant::try_from(model(serde_json::json!({"dims": {"w": 1}})));
        assert!(matches!(result, Err(CatalogError::Internal(_))));
    }
}
