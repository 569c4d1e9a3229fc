use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::{product_metadata, sale_price};

/// Connect, size the pool from `config` and sync the entity schema.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.clone());

    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections.min(config.max_connections))
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(600))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("server::entity::*")
        .sync(&db)
        .await?;

    if config.sale_indexes {
        ensure_sale_indexes(&db).await;
    }

    Ok(db)
}

fn sale_indexes() -> [IndexCreateStatement; 3] {
    [
        Index::create()
            .if_not_exists()
            .name("idx_product_metadata_product_id")
            .table(product_metadata::Entity)
            .col(product_metadata::Column::ProductId)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_product_metadata_priority")
            .table(product_metadata::Entity)
            .col(product_metadata::Column::Priority)
            .to_owned(),
        Index::create()
            .if_not_exists()
            .name("idx_sale_prices_product_id")
            .table(sale_price::Entity)
            .col(sale_price::Column::ProductId)
            .to_owned(),
    ]
}

/// Create the indexes that make the per-product sale lookups cheap.
///
/// Off unless `database.sale_indexes` is set: without them every lookup in the
/// naive listing is a sequential scan. Failures are logged, not fatal.
pub async fn ensure_sale_indexes<C: ConnectionTrait>(db: &C) {
    for index in sale_indexes() {
        let stmt = index.to_string(PostgresQueryBuilder);
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index: {}", stmt),
            Err(e) => warn!("Failed to create index ({}): {}", stmt, e),
        }
    }
}
