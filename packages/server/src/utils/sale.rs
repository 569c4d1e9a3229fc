use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    Statement,
};

use crate::entity::{product, product_metadata, sale_category, sale_price};
use crate::models::sale::{SaleProduct, sort_sale_products};

/// Sale items plus the number of statements it took to load them.
pub struct SaleListing {
    pub items: Vec<SaleProduct>,
    pub queries: usize,
}

/// One row per product: a product with several sale prices or metadata rows
/// keeps the lowest id of each, same as the per-product lookups.
const SALE_LISTING_SQL: &str = r#"
SELECT *
FROM (
    SELECT DISTINCT ON (p.id)
        p.id,
        p.name,
        p.description,
        p.price,
        p.image,
        p.category,
        p.created_at,
        p.updated_at,
        p.price AS original_price,
        sp.sale_price,
        pm.discount,
        pm.sale_category,
        COALESCE(pm.featured, FALSE) AS featured,
        COALESCE(pm.priority, 0) AS priority,
        sc.description AS category_description
    FROM products p
    LEFT JOIN sale_prices sp ON sp.product_id = p.id
    LEFT JOIN product_metadata pm ON pm.product_id = p.id
    LEFT JOIN sale_categories sc
        ON pm.sale_category <> '' AND sc.name = pm.sale_category
    WHERE sp.id IS NOT NULL
    ORDER BY p.id, sp.id, pm.id, sc.id
) AS sale
ORDER BY sale.priority DESC, sale.id ASC
"#;

/// Sale listing built from per-product lookups.
///
/// Issues one query for the catalog, one per product for its sale price and,
/// for products on sale, one for metadata plus one for the category.
pub async fn naive_sale_listing<C: ConnectionTrait>(db: &C) -> Result<SaleListing, DbErr> {
    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;
    let mut queries = 1;
    let mut items = Vec::new();

    for product in products {
        let sale = sale_price::Entity::find()
            .filter(sale_price::Column::ProductId.eq(product.id))
            .order_by_asc(sale_price::Column::Id)
            .one(db)
            .await?;
        queries += 1;
        let Some(sale) = sale else {
            continue;
        };

        let metadata = product_metadata::Entity::find()
            .filter(product_metadata::Column::ProductId.eq(product.id))
            .order_by_asc(product_metadata::Column::Id)
            .one(db)
            .await?;
        queries += 1;

        let category = match metadata.as_ref().and_then(|m| m.sale_category.as_deref()) {
            Some(name) if !name.is_empty() => {
                queries += 1;
                sale_category::Entity::find()
                    .filter(sale_category::Column::Name.eq(name))
                    .order_by_asc(sale_category::Column::Id)
                    .one(db)
                    .await?
            }
            _ => None,
        };

        items.push(SaleProduct::assemble(product, sale, metadata, category));
    }

    sort_sale_products(&mut items);
    Ok(SaleListing { items, queries })
}

/// Sale listing from a single joined statement.
pub async fn joined_sale_listing<C: ConnectionTrait>(db: &C) -> Result<SaleListing, DbErr> {
    let items = SaleProduct::find_by_statement(Statement::from_string(
        db.get_database_backend(),
        SALE_LISTING_SQL,
    ))
    .all(db)
    .await?;

    Ok(SaleListing { items, queries: 1 })
}
