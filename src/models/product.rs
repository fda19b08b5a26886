use serde::{Deserialize, Serialize};

/// A catalog item as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Stored as NUMERIC, converted to f64 on read
    pub price: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub vegan: bool,
    pub cruelty_free: bool,
}

impl Product {
    /// Category text, empty when the product is uncategorized
    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }

    pub fn description_str(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// A third-party review attached to a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub product_id: i64,
    pub source: Option<String>,
    pub review_text: Option<String>,
    pub rating: i32,
}

/// Counts of ethically sourced products in the catalog
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EthicsStats {
    pub vegan: i64,
    pub cruelty_free: i64,
    pub both: i64,
}
