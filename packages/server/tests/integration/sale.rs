use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::Value;

use server::entity::{product, product_metadata, sale_price};

use crate::common::{TestApp, routes};

async fn product_id(app: &TestApp, name: &str) -> i32 {
    product::Entity::find()
        .filter(product::Column::Name.eq(name))
        .one(&app.db)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("seeded product {name} missing"))
        .id
}

fn priorities(body: &Value) -> Vec<(i64, i64)> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|p| (p["priority"].as_i64().unwrap(), p["id"].as_i64().unwrap()))
        .collect()
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn naive_listing_returns_seeded_sale_items_in_priority_order() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::SALE).await;

        assert_eq!(res.status, 200);
        let items = res.body.as_array().unwrap();
        assert_eq!(items.len(), 13);

        let first = &items[0];
        assert_eq!(first["name"], "Performance Profiler Pro");
        assert_eq!(first["priority"], 100);
        assert_eq!(first["featured"], true);
        assert_eq!(first["originalPrice"], "299.99");
        assert_eq!(first["salePrice"], "199.99");
        assert_eq!(first["discount"], "33.33");
        assert_eq!(first["saleCategory"], "Black Friday");
        assert_eq!(first["categoryDescription"], "Exclusive Black Friday deals");

        let order = priorities(&res.body);
        let mut sorted = order.clone();
        sorted.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        assert_eq!(order, sorted);
    }

    #[tokio::test]
    async fn optimized_listing_matches_the_naive_one() {
        let app = TestApp::spawn().await;

        let naive = app.get_without_token(routes::SALE).await;
        let joined = app.get_without_token(routes::SALE_OPTIMIZED).await;

        assert_eq!(joined.status, 200);
        assert_eq!(joined.body, naive.body);
    }

    #[tokio::test]
    async fn both_listings_agree_on_duplicate_and_missing_rows() {
        let app = TestApp::spawn().await;
        let now = chrono::Utc::now();

        // A second, later sale price must not replace the first one.
        let profiler = product_id(&app, "Performance Profiler Pro").await;
        sale_price::ActiveModel {
            product_id: Set(profiler),
            sale_price: Set(Decimal::new(999, 2)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();

        // A product on sale without any metadata.
        let bare = product::ActiveModel {
            name: Set("Bare Sale Item".into()),
            description: Set("On sale with no metadata".into()),
            price: Set(Decimal::new(5000, 2)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap()
        .id;
        sale_price::ActiveModel {
            product_id: Set(bare),
            sale_price: Set(Decimal::new(2500, 2)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();

        // Metadata naming a category that does not exist.
        let logger = product_id(&app, "Error Logger Pro").await;
        product_metadata::ActiveModel {
            product_id: Set(logger),
            discount: Set(None),
            sale_category: Set(Some("Boxing Day".into())),
            featured: Set(Some(true)),
            priority: Set(Some(500)),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();

        let naive = app.get_without_token(routes::SALE).await;
        let joined = app.get_without_token(routes::SALE_OPTIMIZED).await;

        assert_eq!(naive.status, 200);
        assert_eq!(joined.body, naive.body);

        let items = naive.body.as_array().unwrap();
        assert_eq!(items.len(), 14);

        let profiler_item = items
            .iter()
            .find(|p| p["id"] == profiler)
            .expect("profiler still listed");
        assert_eq!(profiler_item["salePrice"], "199.99");

        // The original metadata row for the logger has the lower id and wins.
        let logger_item = items.iter().find(|p| p["id"] == logger).unwrap();
        assert_eq!(logger_item["priority"], 45);

        let bare_item = items.iter().find(|p| p["id"] == bare).unwrap();
        assert_eq!(bare_item["priority"], 0);
        assert_eq!(bare_item["featured"], false);
        assert!(bare_item["saleCategory"].is_null());
        assert!(bare_item["categoryDescription"].is_null());
        assert_eq!(items.last().unwrap()["id"], bare);
    }

    #[tokio::test]
    async fn shop_lists_every_product() {
        let app = TestApp::spawn().await;

        let shop = app.get_without_token(routes::SALE_SHOP).await;
        let products = app.get_without_token(routes::PRODUCTS).await;

        assert_eq!(shop.status, 200);
        assert_eq!(shop.body, products.body);
    }

    #[tokio::test]
    async fn sale_indexes_leave_the_listing_unchanged() {
        let app = TestApp::spawn().await;
        let before = app.get_without_token(routes::SALE_OPTIMIZED).await;

        server::database::ensure_sale_indexes(&app.db).await;
        // Running it twice must be harmless.
        server::database::ensure_sale_indexes(&app.db).await;

        let indexes = app
            .count_rows(
                "SELECT COUNT(*) FROM pg_indexes WHERE indexname IN \
                 ('idx_product_metadata_product_id', 'idx_product_metadata_priority', \
                 'idx_sale_prices_product_id')",
            )
            .await;
        assert_eq!(indexes, 3);

        let naive = app.get_without_token(routes::SALE).await;
        let joined = app.get_without_token(routes::SALE_OPTIMIZED).await;
        assert_eq!(joined.body, before.body);
        assert_eq!(naive.body, before.body);
    }
}
