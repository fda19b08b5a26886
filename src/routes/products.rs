use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{EthicsFilter, Product, ProductSearch, Review},
    routes::AppState,
};

const REVIEW_LIMIT: usize = 10;

/// Accepts `1`/`0`, `true`/`false`, `on`/`off` style query flags
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub vegan: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub cruelty_free: bool,
}

impl SearchParams {
    /// 1-based page number, treating 0 as the first page
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Catalog search for these parameters; pages past the addressable range are rejected
    pub fn to_search(&self, page_size: usize) -> AppResult<ProductSearch> {
        let offset = (self.page() - 1)
            .checked_mul(page_size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::InvalidInput("Page number is out of range".to_string()))?;

        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        Ok(ProductSearch {
            term: self.q.trim().to_string(),
            category,
            filter: EthicsFilter {
                vegan: self.vegan,
                cruelty_free: self.cruelty_free,
            },
            limit: page_size,
            offset,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<Product>,
    pub page: usize,
    pub count: usize,
}

/// Handler for catalog search; non-empty terms are recorded in search history
pub async fn search(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let search = params.to_search(state.config.search_page_size)?;

    if !search.term.is_empty() {
        state.accounts.save_search(auth.user.id, &search.term).await?;
    }

    let products = state.catalog.search(&search).await?;

    tracing::debug!(
        user_id = auth.user.id,
        term = %search.term,
        results = products.len(),
        "Catalog search"
    );

    Ok(Json(SearchResponse {
        count: products.len(),
        page: params.page(),
        products,
    }))
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub product: Product,
    pub reviews: Vec<Review>,
}

/// Handler for a single product with its reviews
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductDetailResponse>> {
    let product = state
        .catalog
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    let reviews = state.catalog.reviews_for_product(id, REVIEW_LIMIT).await?;

    Ok(Json(ProductDetailResponse { product, reviews }))
}

/// Handler listing catalog categories
pub async fn categories(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.catalog.categories().await?))
}
