use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One sale price per row, linked to a product by a bare integer.
///
/// There is deliberately no foreign key or index on `product_id`; the sale
/// listing exercises the resulting lookup cost.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub sale_price: Decimal,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
