use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale metadata kept apart from the product row.
///
/// `sale_category` refers to [`super::sale_category`] by name only.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_metadata")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub product_id: i32,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub discount: Option<Decimal>,
    #[sea_orm(column_type = "String(StringLen::N(100))", nullable)]
    pub sale_category: Option<String>,
    #[sea_orm(default_value = false)]
    pub featured: Option<bool>,
    #[sea_orm(default_value = 0)]
    pub priority: Option<i32>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
