use std::time::Instant;

use axum::Json;
use axum::extract::State;
use sea_orm::*;
use tracing::instrument;

use crate::entity::product;
use crate::error::AppError;
use crate::models::product::ProductResponse;
use crate::models::sale::SaleProduct;
use crate::state::AppState;
use crate::utils::sale::{SaleListing, joined_sale_listing, naive_sale_listing};

fn log_listing(variant: &str, listing: &SaleListing, started: Instant) {
    tracing::info!(
        variant,
        items = listing.items.len(),
        db_queries = listing.queries,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Built sale listing"
    );
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Sale",
    operation_id = "listSale",
    summary = "List products on sale (per-product lookups)",
    description = "Loads the catalog and then looks up sale price, metadata and category one product at a time. Sorted by priority descending, then id.",
    responses(
        (status = 200, description = "Products on sale", body = Vec<SaleProduct>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_sale(State(state): State<AppState>) -> Result<Json<Vec<SaleProduct>>, AppError> {
    let started = Instant::now();
    let listing = naive_sale_listing(&state.db).await?;
    log_listing("naive", &listing, started);
    Ok(Json(listing.items))
}

#[utoipa::path(
    get,
    path = "/optimized",
    tag = "Sale",
    operation_id = "listSaleOptimized",
    summary = "List products on sale (single statement)",
    description = "Same result as `GET /api/sale`, built from one joined query.",
    responses(
        (status = 200, description = "Products on sale", body = Vec<SaleProduct>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_sale_optimized(
    State(state): State<AppState>,
) -> Result<Json<Vec<SaleProduct>>, AppError> {
    let started = Instant::now();
    let listing = joined_sale_listing(&state.db).await?;
    log_listing("joined", &listing, started);
    Ok(Json(listing.items))
}

#[utoipa::path(
    get,
    path = "/shop",
    tag = "Sale",
    operation_id = "listShop",
    summary = "List every product for the sale page",
    responses(
        (status = 200, description = "All products ordered by id", body = Vec<ProductResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_shop(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}
