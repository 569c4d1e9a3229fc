use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::entity::{product, product_metadata, sale_category, sale_price};

/// A product on sale, with its pricing and category metadata flattened in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleProduct {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Performance Profiler Pro")]
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "299.99")]
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[schema(value_type = String, example = "299.99")]
    pub original_price: Decimal,
    #[schema(value_type = String, example = "199.99")]
    pub sale_price: Decimal,
    /// Percentage off, e.g. `33.33`.
    #[schema(value_type = Option<String>, example = "33.33")]
    pub discount: Option<Decimal>,
    #[schema(example = "Black Friday")]
    pub sale_category: Option<String>,
    pub featured: bool,
    /// Higher sorts first.
    #[schema(example = 100)]
    pub priority: i32,
    #[schema(example = "Exclusive Black Friday deals")]
    pub category_description: Option<String>,
}

impl SaleProduct {
    /// Combine the rows the per-product lookups return.
    pub fn assemble(
        product: product::Model,
        sale: sale_price::Model,
        metadata: Option<product_metadata::Model>,
        category: Option<sale_category::Model>,
    ) -> Self {
        let (discount, sale_category, featured, priority) = match metadata {
            Some(m) => (
                m.discount,
                m.sale_category,
                m.featured.unwrap_or(false),
                m.priority.unwrap_or(0),
            ),
            None => (None, None, false, 0),
        };

        Self {
            id: product.id,
            original_price: product.price,
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
            category: product.category,
            created_at: product.created_at,
            updated_at: product.updated_at,
            sale_price: sale.sale_price,
            discount,
            sale_category,
            featured,
            priority,
            category_description: category.and_then(|c| c.description),
        }
    }
}

/// Priority descending, then id ascending.
pub fn sort_sale_products(items: &mut [SaleProduct]) {
    items.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
}
