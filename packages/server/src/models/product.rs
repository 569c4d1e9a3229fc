use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entity::product;
use crate::error::AppError;
use crate::models::shared::{check_len, check_money};

pub const NAME_MAX_LEN: usize = 255;
pub const IMAGE_MAX_LEN: usize = 255;
pub const CATEGORY_MAX_LEN: usize = 100;

pub const DEFAULT_SEARCH_LIMIT: u64 = 8;
pub const MAX_SEARCH_LIMIT: u64 = 25;
/// Autocomplete kicks in from this many characters.
pub const AUTOCOMPLETE_MIN_LEN: usize = 2;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Performance Profiler Pro")]
    pub name: String,
    #[schema(example = "Find the slow parts before your users do")]
    pub description: String,
    #[schema(value_type = String, example = "299.99")]
    pub price: Decimal,
    #[schema(example = "/images/profiler.png")]
    pub image: Option<String>,
    #[schema(example = "Tools")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product::Model> for ProductResponse {
    fn from(m: product::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            image: m.image,
            category: m.category,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Request body for creating a product. `price` accepts a string or a number.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "Trace Explorer")]
    pub name: Option<String>,
    #[schema(example = "Follow a request across every service")]
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "49.99")]
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// A product ready to insert.
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
}

pub fn validate_create_product(payload: CreateProductRequest) -> Result<NewProduct, AppError> {
    let name = payload.name.filter(|s| !s.trim().is_empty());
    let description = payload.description.filter(|s| !s.trim().is_empty());
    let (Some(name), Some(description), Some(price)) = (name, description, payload.price) else {
        return Err(AppError::Validation(
            "Name, description, and price are required".into(),
        ));
    };
    if price.is_sign_negative() {
        return Err(AppError::Validation("Price must not be negative".into()));
    }
    check_money("Price", price)?;
    check_len("Name", &name, NAME_MAX_LEN)?;
    if let Some(image) = &payload.image {
        check_len("Image", image, IMAGE_MAX_LEN)?;
    }
    if let Some(category) = &payload.category {
        check_len("Category", category, CATEGORY_MAX_LEN)?;
    }

    Ok(NewProduct {
        name,
        description,
        price,
        image: payload.image,
        category: payload.category,
    })
}

/// Query parameters for product search.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Text matched against name and description.
    #[param(example = "pro")]
    pub q: Option<String>,
    /// `1` returns matching product names only.
    #[param(example = "1")]
    pub autocomplete: Option<String>,
    /// Max results (default 8, capped at 25).
    #[param(example = "8")]
    pub limit: Option<String>,
}

/// How a search request should be served.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Blank query, answered with an empty list.
    Empty,
    Autocomplete { term: String, limit: u64 },
    Full { term: String, limit: u64 },
}

impl SearchQuery {
    pub fn mode(&self) -> SearchMode {
        let term = self.q.as_deref().unwrap_or_default().trim();
        if term.is_empty() {
            return SearchMode::Empty;
        }

        let limit = self
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u64>().ok())
            .filter(|&l| l > 0)
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .min(MAX_SEARCH_LIMIT);
        let term = term.to_string();

        if self.autocomplete.as_deref() == Some("1") && term.chars().count() >= AUTOCOMPLETE_MIN_LEN
        {
            SearchMode::Autocomplete { term, limit }
        } else {
            SearchMode::Full { term, limit }
        }
    }
}

/// Row returned by full-text product search.
#[derive(Debug, Serialize, FromQueryResult, utoipa::ToSchema)]
pub struct ProductSearchHit {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Performance Profiler Pro")]
    pub name: String,
    #[schema(value_type = String, example = "299.99")]
    pub price: Decimal,
    pub image: Option<String>,
    pub category: Option<String>,
}

/// Either autocomplete suggestions or matching products.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum SearchResponse {
    Suggestions(Vec<String>),
    Products(Vec<ProductSearchHit>),
}
