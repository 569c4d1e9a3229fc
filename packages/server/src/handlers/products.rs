use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::instrument;

use crate::entity::product;
use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::models::product::*;
use crate::models::shared::contains_pattern;
use crate::state::AppState;

/// Raw listing used by the v2 product query endpoint.
const PRODUCT_QUERY_SQL: &str = "SELECT id, name, description, price, image, category, created_at, updated_at \
     FROM products ORDER BY id";

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "listProducts",
    summary = "List all products",
    responses(
        (status = 200, description = "All products ordered by id", body = Vec<ProductResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = product::Entity::find()
        .order_by_asc(product::Column::Id)
        .all(&state.db)
        .await?;

    tracing::debug!(count = products.len(), "Fetched products");
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    operation_id = "getProduct",
    summary = "Get a product by ID",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product details", body = ProductResponse),
        (status = 400, description = "Non-numeric ID (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Product not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, AppError> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::Validation("Product ID must be a number".into()))?;

    let model = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Products",
    operation_id = "createProduct",
    summary = "Create a product",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new = validate_create_product(payload)?;

    let now = chrono::Utc::now();
    let model = product::ActiveModel {
        name: Set(new.name),
        description: Set(new.description),
        price: Set(new.price),
        image: Set(new.image),
        category: Set(new.category),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(product_id = model.id, "Product created");
    Ok((StatusCode::CREATED, Json(ProductResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "Products",
    operation_id = "searchProducts",
    summary = "Search products or autocomplete names",
    description = "Case-insensitive substring match. With `autocomplete=1` and at least two characters, returns distinct product names; otherwise returns matching products ordered by name. A blank query returns an empty list.",
    params(SearchQuery),
    responses(
        (status = 200, description = "Names or products", body = SearchResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let (term, limit, autocomplete) = match query.mode() {
        SearchMode::Empty => return Ok(Json(SearchResponse::Products(Vec::new()))),
        SearchMode::Autocomplete { term, limit } => (term, limit, true),
        SearchMode::Full { term, limit } => (term, limit, false),
    };

    let pattern = contains_pattern(&term.to_lowercase());
    let matches = |col: product::Column| {
        Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };

    if autocomplete {
        let names = product::Entity::find()
            .select_only()
            .column(product::Column::Name)
            .distinct()
            .filter(matches(product::Column::Name))
            .order_by_asc(product::Column::Name)
            .limit(limit)
            .into_tuple::<String>()
            .all(&state.db)
            .await?;
        return Ok(Json(SearchResponse::Suggestions(names)));
    }

    let hits = product::Entity::find()
        .select_only()
        .columns([
            product::Column::Id,
            product::Column::Name,
            product::Column::Price,
            product::Column::Image,
            product::Column::Category,
        ])
        .filter(
            Condition::any()
                .add(matches(product::Column::Name))
                .add(matches(product::Column::Description)),
        )
        .order_by_asc(product::Column::Name)
        .limit(limit)
        .into_model::<ProductSearchHit>()
        .all(&state.db)
        .await?;

    Ok(Json(SearchResponse::Products(hits)))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Products",
    operation_id = "queryProducts",
    summary = "List all products through a raw statement",
    description = "Same rows as `GET /api/products`, served to clients with `STOREQUERY_V2` enabled.",
    responses(
        (status = 200, description = "All products ordered by id", body = Vec<ProductResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn product_query(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = ProductResponse::find_by_statement(Statement::from_string(
        state.db.get_database_backend(),
        PRODUCT_QUERY_SQL,
    ))
    .all(&state.db)
    .await?;

    tracing::debug!(count = products.len(), "Fetched products (v2)");
    Ok(Json(products))
}
