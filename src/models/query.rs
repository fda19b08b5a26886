use serde::{Deserialize, Serialize};

use super::Product;

/// Categories a skin-related clause is restricted to
pub const SKINCARE_CATEGORIES: [&str; 6] = [
    "Skincare",
    "Face",
    "Body",
    "Moisturizers",
    "Cleansers",
    "Treatments",
];

/// Categories a hair-related clause is restricted to
pub const HAIRCARE_CATEGORIES: [&str; 4] = ["Haircare", "Shampoo", "Conditioner", "Styling"];

/// Category restriction carried by a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    Skincare,
    Haircare,
    /// No restriction; the term is also matched against the category text
    Any,
}

impl CategoryScope {
    /// Allowed category names, or `None` for an unrestricted scope
    pub fn categories(self) -> Option<&'static [&'static str]> {
        match self {
            CategoryScope::Skincare => Some(&SKINCARE_CATEGORIES),
            CategoryScope::Haircare => Some(&HAIRCARE_CATEGORIES),
            CategoryScope::Any => None,
        }
    }
}

/// One OR-branch of a recommendation predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub scope: CategoryScope,
    /// Lower-cased substring to look for
    pub term: String,
}

impl Clause {
    pub fn skincare(term: impl Into<String>) -> Self {
        Self {
            scope: CategoryScope::Skincare,
            term: term.into(),
        }
    }

    pub fn haircare(term: impl Into<String>) -> Self {
        Self {
            scope: CategoryScope::Haircare,
            term: term.into(),
        }
    }

    pub fn neutral(term: impl Into<String>) -> Self {
        Self {
            scope: CategoryScope::Any,
            term: term.into(),
        }
    }

    /// Evaluates the clause against a single product
    ///
    /// Mirrors the SQL the Postgres catalog generates: category membership is an
    /// exact comparison, text matching is a case-insensitive substring search.
    pub fn matches(&self, product: &Product) -> bool {
        let name = product.name.to_lowercase();
        let description = product.description_str().to_lowercase();
        let text_match = name.contains(&self.term) || description.contains(&self.term);

        match self.scope.categories() {
            Some(categories) => categories.contains(&product.category_str()) && text_match,
            None => text_match || product.category_str().to_lowercase().contains(&self.term),
        }
    }
}

/// Vegan / cruelty-free constraint applied on top of every other predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthicsFilter {
    pub vegan: bool,
    pub cruelty_free: bool,
}

impl EthicsFilter {
    pub fn vegan_and_cruelty_free() -> Self {
        Self {
            vegan: true,
            cruelty_free: true,
        }
    }

    pub fn allows(&self, product: &Product) -> bool {
        (!self.vegan || product.vegan) && (!self.cruelty_free || product.cruelty_free)
    }
}

/// A disjunction of clauses evaluated against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub clauses: Vec<Clause>,
    pub filter: EthicsFilter,
    pub limit: usize,
    /// Seed of the random permutation the matches are returned in
    pub seed: u64,
}

impl CatalogQuery {
    /// True when the product satisfies any clause and the hard filter
    pub fn matches(&self, product: &Product) -> bool {
        self.filter.allows(product) && self.clauses.iter().any(|c| c.matches(product))
    }
}

/// Paged keyword search over name and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSearch {
    pub term: String,
    /// Exact category, `None` for all categories
    pub category: Option<String>,
    pub filter: EthicsFilter,
    pub limit: usize,
    pub offset: usize,
}

impl ProductSearch {
    pub fn matches(&self, product: &Product) -> bool {
        let term = self.term.to_lowercase();
        let text_match = product.name.to_lowercase().contains(&term)
            || product.description_str().to_lowercase().contains(&term);
        let category_match = self
            .category
            .as_deref()
            .map_or(true, |category| product.category_str() == category);

        text_match && category_match && self.filter.allows(product)
    }
}

/// Builds a LIKE pattern matching `term` anywhere, escaping wildcard characters
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
