use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        query::like_pattern, CatalogQuery, Clause, EthicsFilter, EthicsStats, Product,
        ProductSearch, Review,
    },
    services::catalog::Catalog,
};

const PRODUCT_COLUMNS: &str =
    "SELECT id, name, price::FLOAT8 AS price, category, description, vegan, cruelty_free FROM products";

/// Catalog backed by the `products` and `reviews` tables
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends `(clause OR clause ...)` to the builder
///
/// LIKE patterns rely on Postgres' default backslash escape.
fn push_clauses(builder: &mut QueryBuilder<'_, Postgres>, clauses: &[Clause]) {
    builder.push("(");
    for (i, clause) in clauses.iter().enumerate() {
        if i > 0 {
            builder.push(" OR ");
        }
        let pattern = like_pattern(&clause.term);

        builder.push("(");
        if let Some(categories) = clause.scope.categories() {
            let categories: Vec<String> = categories.iter().map(|c| c.to_string()).collect();
            builder
                .push("category = ANY(")
                .push_bind(categories)
                .push(") AND ");
        }
        builder
            .push("(LOWER(name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(COALESCE(description, '')) LIKE ")
            .push_bind(pattern.clone());
        if clause.scope.categories().is_none() {
            builder
                .push(" OR LOWER(COALESCE(category, '')) LIKE ")
                .push_bind(pattern);
        }
        builder.push("))");
    }
    builder.push(")");
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: EthicsFilter) {
    if filter.vegan {
        builder.push(" AND vegan = TRUE");
    }
    if filter.cruelty_free {
        builder.push(" AND cruelty_free = TRUE");
    }
}

/// Orders rows by a permutation derived from `seed` and caps the result
fn push_shuffled_limit(builder: &mut QueryBuilder<'_, Postgres>, seed: u64, limit: usize) {
    builder
        .push(" ORDER BY md5(id::text || ")
        .push_bind(seed.to_string())
        .push(") LIMIT ")
        .push_bind(limit as i64);
}

pub(crate) fn matching_query(query: &CatalogQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);
    builder.push(" WHERE ");
    push_clauses(&mut builder, &query.clauses);
    push_filter(&mut builder, query.filter);
    push_shuffled_limit(&mut builder, query.seed, query.limit);
    builder
}

pub(crate) fn sample_query(
    filter: EthicsFilter,
    limit: usize,
    seed: u64,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);
    builder.push(" WHERE TRUE");
    push_filter(&mut builder, filter);
    push_shuffled_limit(&mut builder, seed, limit);
    builder
}

/// Converts a paging value to the BIGINT Postgres expects
fn sql_bigint(value: usize, name: &str) -> AppResult<i64> {
    i64::try_from(value).map_err(|_| AppError::InvalidInput(format!("{} is out of range", name)))
}

pub(crate) fn search_query(search: &ProductSearch) -> AppResult<QueryBuilder<'static, Postgres>> {
    let limit = sql_bigint(search.limit, "Page size")?;
    let offset = sql_bigint(search.offset, "Page")?;
    let pattern = like_pattern(&search.term.to_lowercase());
    let mut builder = QueryBuilder::new(PRODUCT_COLUMNS);
    builder
        .push(" WHERE (LOWER(name) LIKE ")
        .push_bind(pattern.clone())
        .push(" OR LOWER(COALESCE(description, '')) LIKE ")
        .push_bind(pattern)
        .push(")");
    if let Some(category) = &search.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    push_filter(&mut builder, search.filter);
    builder
        .push(" ORDER BY id LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    Ok(builder)
}

#[async_trait::async_trait]
impl Catalog for PgCatalog {
    async fn find_matching(&self, query: &CatalogQuery) -> AppResult<Vec<Product>> {
        if query.clauses.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let products = matching_query(query)
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn sample(
        &self,
        filter: EthicsFilter,
        limit: usize,
        seed: u64,
    ) -> AppResult<Vec<Product>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let products = sample_query(filter, limit, seed)
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn get_product(&self, id: i64) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!("{} WHERE id = $1", PRODUCT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    async fn reviews_for_product(&self, product_id: i64, limit: usize) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, product_id, source, review_text, rating
            FROM reviews
            WHERE product_id = $1
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(product_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn search(&self, search: &ProductSearch) -> AppResult<Vec<Product>> {
        let products = search_query(search)?
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM products
            WHERE category IS NOT NULL AND category <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn product_count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn ethics_stats(&self) -> AppResult<EthicsStats> {
        let (vegan, cruelty_free, both) = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE vegan),
                COUNT(*) FILTER (WHERE cruelty_free),
                COUNT(*) FILTER (WHERE vegan AND cruelty_free)
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(EthicsStats {
            vegan,
            cruelty_free,
            both,
        })
    }
}
