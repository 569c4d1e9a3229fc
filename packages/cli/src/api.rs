use anyhow::{Context, Result, bail};
use common::FlagMap;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A catalog product as the storefront shows it.
#[derive(Debug, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: i32,
    pub name: String,
    pub original_price: String,
    pub sale_price: String,
    pub discount: Option<String>,
    pub sale_category: Option<String>,
    pub featured: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Blocking client for the shop API.
pub struct ApiClient {
    base: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("Failed to reach {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => bail!("{} ({}): {}", status, body.code, body.error),
                Err(_) => bail!("{status}: {text}"),
            }
        }

        response
            .json()
            .with_context(|| format!("Unexpected response from {url}"))
    }

    pub fn flag_defaults(&self) -> Result<FlagMap> {
        self.get("/api/flags", &[])
    }

    /// All products, read through the raw-statement endpoint when `v2` is set.
    pub fn products(&self, v2: bool) -> Result<Vec<Product>> {
        let path = if v2 { "/api/product-query" } else { "/api/products" };
        self.get(path, &[])
    }

    pub fn search(&self, term: &str) -> Result<Vec<Product>> {
        self.get("/api/products/search", &[("q", term), ("limit", "25")])
    }

    pub fn sale(&self, optimized: bool) -> Result<Vec<SaleItem>> {
        let path = if optimized {
            "/api/sale/optimized"
        } else {
            "/api/sale"
        };
        self.get(path, &[])
    }
}
