use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Variants::Table)
                    .if_not_exists()
                    .col(pk_uuid(Variants::Id))
                    .col(uuid(Variants::ProductId))
                    .col(uuid(Variants::SupplierId))
                    .col(uuid(Variants::CategoryId))
                    .col(json_binary(Variants::Attributes).default(Expr::cust("'{}'::jsonb")))
                    // Minor currency units (cents)
                    .col(big_integer(Variants::Price))
                    .col(integer(Variants::Stock).default(0))
                    .col(text(Variants::Sku).unique_key())
                    .col(big_integer(Variants::TotalSold).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                ALTER TABLE variants
                    ADD CONSTRAINT variants_stock_non_negative CHECK (stock >= 0),
                    ADD CONSTRAINT variants_total_sold_non_negative CHECK (total_sold >= 0)
                "#,
            )
            .await?;

        for (name, column) in [
            ("idx_variants_product_id", Variants::ProductId),
            ("idx_variants_category_id", Variants::CategoryId),
            ("idx_variants_supplier_id", Variants::SupplierId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Variants::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Variants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Variants {
    Table,
    Id,
    ProductId,
    SupplierId,
    CategoryId,
    Attributes,
    Price,
    Stock,
    Sku,
    TotalSold,
}
