//! Product catalog storage abstraction
//!
//! The recommendation engine only needs `find_matching` and `sample`; the remaining
//! operations back the search, product detail and dashboard endpoints.
use crate::{
    error::AppResult,
    models::{CatalogQuery, EthicsFilter, EthicsStats, Product, ProductSearch, Review},
};

pub mod postgres;

pub use postgres::PgCatalog;

/// Read access to products and their reviews
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Products satisfying any clause of the query and its hard filter
    ///
    /// Rows come back in a random order determined by `query.seed`, at most
    /// `query.limit` of them.
    async fn find_matching(&self, query: &CatalogQuery) -> AppResult<Vec<Product>>;

    /// Up to `limit` products drawn uniformly at random under the hard filter
    async fn sample(&self, filter: EthicsFilter, limit: usize, seed: u64)
        -> AppResult<Vec<Product>>;

    async fn get_product(&self, id: i64) -> AppResult<Option<Product>>;

    async fn reviews_for_product(&self, product_id: i64, limit: usize) -> AppResult<Vec<Review>>;

    /// Keyword search over name and description, in id order
    async fn search(&self, search: &ProductSearch) -> AppResult<Vec<Product>>;

    /// Distinct non-empty categories
    async fn categories(&self) -> AppResult<Vec<String>>;

    async fn product_count(&self) -> AppResult<i64>;

    async fn ethics_stats(&self) -> AppResult<EthicsStats>;

    /// Random products that are both vegan and cruelty-free
    async fn featured_vegan_cruelty_free(&self, limit: usize, seed: u64) -> AppResult<Vec<Product>> {
        self.sample(EthicsFilter::vegan_and_cruelty_free(), limit, seed)
            .await
    }
}
