use std::collections::HashSet;

use rand::Rng;

use crate::{
    error::AppResult,
    models::{CatalogQuery, Clause, EthicsFilter, Product, RecommendationRequest, UserProfile},
    services::catalog::Catalog,
};

/// Words that mark a keyword as hair-related
pub const HAIR_VOCABULARY: [&str; 4] = ["hair", "scalp", "frizz", "curl"];

/// Words that mark a keyword as skin-related
pub const SKIN_VOCABULARY: [&str; 5] = ["skin", "face", "acne", "wrinkle", "pimple"];

/// Category intent detected in a free-text keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Haircare,
    Skincare,
    Neutral,
}

/// Classifies a lower-cased keyword by substring match against the vocabularies
///
/// Hair vocabulary is checked first, so "curly" and "scalp care" are haircare and
/// "face wash" is skincare.
pub fn classify_term(token: &str) -> TermKind {
    if HAIR_VOCABULARY.iter().any(|word| token.contains(word)) {
        TermKind::Haircare
    } else if SKIN_VOCABULARY.iter().any(|word| token.contains(word)) {
        TermKind::Skincare
    } else {
        TermKind::Neutral
    }
}

/// Translates a profile into the OR-combined clauses evaluated against the catalog
///
/// Order follows the profile: skin type, hair type, then issue and goal keywords.
/// Repeated clauses are dropped since OR is idempotent.
pub fn build_clauses(profile: &UserProfile) -> Vec<Clause> {
    let mut clauses = Vec::new();

    if let Some(term) = profile.skin_term() {
        clauses.push(Clause::skincare(term));
    }
    if let Some(term) = profile.hair_term() {
        clauses.push(Clause::haircare(term));
    }
    for token in profile.keyword_tokens() {
        let clause = match classify_term(&token) {
            TermKind::Haircare => Clause::haircare(token),
            TermKind::Skincare => Clause::skincare(token),
            TermKind::Neutral => Clause::neutral(token),
        };
        clauses.push(clause);
    }

    let mut seen = HashSet::new();
    clauses.retain(|clause| seen.insert(clause.clone()));
    clauses
}

/// Everything needed to run one recommendation, with randomness already drawn
///
/// Building the plan is synchronous so that a non-`Send` generator such as
/// `thread_rng()` never lives across an await point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationPlan {
    pub clauses: Vec<Clause>,
    pub filter: EthicsFilter,
    pub limit: usize,
    pub match_seed: u64,
    pub backfill_seed: u64,
}

impl RecommendationPlan {
    pub fn new<R: Rng + ?Sized>(request: &RecommendationRequest, rng: &mut R) -> Self {
        Self {
            clauses: build_clauses(&request.profile),
            filter: request.profile.ethics_filter(),
            limit: request.limit,
            match_seed: rng.gen(),
            backfill_seed: rng.gen(),
        }
    }

    /// Runs the plan against the catalog
    ///
    /// With no clauses the result is a uniform random sample. Otherwise the matches
    /// are topped up with random rows when there are fewer than `limit`; backfilled
    /// rows are neither category-restricted nor de-duplicated against the matches.
    /// The hard filter applies to every row either way.
    pub async fn execute(self, catalog: &dyn Catalog) -> AppResult<Vec<Product>> {
        if self.limit == 0 {
            return Ok(Vec::new());
        }

        if self.clauses.is_empty() {
            tracing::debug!(limit = self.limit, "Empty profile, sampling catalog");
            return catalog
                .sample(self.filter, self.limit, self.match_seed)
                .await;
        }

        let query = CatalogQuery {
            clauses: self.clauses,
            filter: self.filter,
            limit: self.limit,
            seed: self.match_seed,
        };
        let mut products = catalog.find_matching(&query).await?;

        tracing::debug!(
            clauses = query.clauses.len(),
            matched = products.len(),
            limit = self.limit,
            "Evaluated recommendation clauses"
        );

        if products.len() < self.limit {
            let remaining = self.limit - products.len();
            let backfill = catalog
                .sample(self.filter, remaining, self.backfill_seed)
                .await?;
            tracing::debug!(
                requested = remaining,
                backfilled = backfill.len(),
                "Backfilled recommendations"
            );
            products.extend(backfill);
        }

        products.truncate(self.limit);
        Ok(products)
    }
}

/// Recommends up to `request.limit` products for a profile
pub async fn recommend<R: Rng + ?Sized>(
    catalog: &dyn Catalog,
    request: &RecommendationRequest,
    rng: &mut R,
) -> AppResult<Vec<Product>> {
    RecommendationPlan::new(request, rng).execute(catalog).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::query::{HAIRCARE_CATEGORIES, SKINCARE_CATEGORIES};
    use crate::models::CategoryScope;
    use crate::services::catalog::MockCatalog;
    use mockall::predicate::{always, eq};
    use rand::{rngs::StdRng, SeedableRng};
    use std::sync::{Arc, Mutex};

    fn product(id: i64, category: &str, vegan: bool, cruelty_free: bool) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            price: Some(20.0),
            category: Some(category.to_string()),
            description: None,
            vegan,
            cruelty_free,
        }
    }

    fn profile() -> UserProfile {
        UserProfile::default()
    }

    #[test]
    fn test_classify_term_vocabularies() {
        for word in HAIR_VOCABULARY {
            assert_eq!(classify_term(word), TermKind::Haircare, "{}", word);
        }
        for word in SKIN_VOCABULARY {
            assert_eq!(classify_term(word), TermKind::Skincare, "{}", word);
        }
        assert_eq!(classify_term("frizzy"), TermKind::Haircare);
        assert_eq!(classify_term("dark spots"), TermKind::Neutral);
        assert_eq!(classify_term("hydration"), TermKind::Neutral);
    }

    #[test]
    fn test_hair_vocabulary_wins_over_skin() {
        assert_eq!(classify_term("scalp skin"), TermKind::Haircare);
    }

    #[test]
    fn test_build_clauses_skin_and_hair_types() {
        let clauses = build_clauses(&UserProfile {
            skin_type: Some("Oily".to_string()),
            hair_type: Some("curly".to_string()),
            ..profile()
        });

        assert_eq!(
            clauses,
            vec![Clause::skincare("oily"), Clause::haircare("curly")]
        );
    }

    #[test]
    fn test_build_clauses_classifies_issue_and_goal_tokens() {
        let clauses = build_clauses(&UserProfile {
            issues: Some("acne, frizz, dark spots".to_string()),
            goal: Some("glow".to_string()),
            ..profile()
        });

        assert_eq!(
            clauses,
            vec![
                Clause::skincare("acne"),
                Clause::haircare("frizz"),
                Clause::neutral("dark spots"),
                Clause::neutral("glow"),
            ]
        );
    }

    #[test]
    fn test_build_clauses_drops_repeats() {
        let clauses = build_clauses(&UserProfile {
            issues: Some("acne,acne".to_string()),
            goal: Some("no acne".to_string()),
            ..profile()
        });

        assert_eq!(clauses, vec![Clause::skincare("acne"), Clause::neutral("no")]);
    }

    #[test]
    fn test_empty_profile_has_no_clauses() {
        assert!(build_clauses(&profile()).is_empty());
    }

    #[tokio::test]
    async fn test_clause_set_is_independent_of_seed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();

        let mut catalog = MockCatalog::new();
        catalog
            .expect_find_matching()
            .times(2)
            .returning(move |query| {
                captured.lock().unwrap().push(query.clone());
                Ok((0..query.limit as i64)
                    .map(|id| product(id, "Skincare", false, false))
                    .collect())
            });
        catalog.expect_sample().never();

        let request = RecommendationRequest::new(
            UserProfile {
                skin_type: Some("dry".to_string()),
                issues: Some("wrinkles, scalp".to_string()),
                goal: Some("soft hair".to_string()),
                ..profile()
            },
            5,
        );

        for seed in [1, 2] {
            recommend(&catalog, &request, &mut StdRng::seed_from_u64(seed))
                .await
                .unwrap();
        }

        let queries = seen.lock().unwrap().clone();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].clauses, queries[1].clauses);
        assert_ne!(queries[0].seed, queries[1].seed);
        assert_eq!(queries[0].clauses.len(), 5);
    }

    #[test]
    fn test_category_lists_are_disjoint() {
        for category in SKINCARE_CATEGORIES {
            assert!(!HAIRCARE_CATEGORIES.contains(&category));
        }
    }

    #[tokio::test]
    async fn test_empty_profile_samples_catalog() {
        let mut catalog = MockCatalog::new();
        catalog.expect_find_matching().never();
        catalog
            .expect_sample()
            .with(eq(EthicsFilter::default()), eq(6), always())
            .times(1)
            .returning(|_, limit, _| {
                Ok((0..limit as i64)
                    .map(|id| product(id, "Body", false, false))
                    .collect())
            });

        let request = RecommendationRequest::new(profile(), 6);
        let products = recommend(&catalog, &request, &mut StdRng::seed_from_u64(9))
            .await
            .unwrap();

        assert_eq!(products.len(), 6);
    }

    #[tokio::test]
    async fn test_oily_curly_union_is_passed_to_catalog() {
        let seen = Arc::new(Mutex::new(None));
        let captured = seen.clone();

        let mut catalog = MockCatalog::new();
        catalog
            .expect_find_matching()
            .times(1)
            .returning(move |query| {
                *captured.lock().unwrap() = Some(query.clone());
                Ok((0..query.limit as i64)
                    .map(|id| product(id, "Skincare", false, false))
                    .collect())
            });
        catalog.expect_sample().never();

        let request = RecommendationRequest::new(
            UserProfile {
                skin_type: Some("oily".to_string()),
                hair_type: Some("curly".to_string()),
                ..profile()
            },
            4,
        );
        let products = recommend(&catalog, &request, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();
        assert_eq!(products.len(), 4);

        let query = seen.lock().unwrap().clone().unwrap();
        assert_eq!(query.limit, 4);
        assert!(query.clauses.contains(&Clause {
            scope: CategoryScope::Skincare,
            term: "oily".to_string(),
        }));
        assert!(query.clauses.contains(&Clause {
            scope: CategoryScope::Haircare,
            term: "curly".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_shortfall_is_backfilled_under_hard_filter() {
        let filter = EthicsFilter {
            vegan: true,
            cruelty_free: false,
        };

        let mut catalog = MockCatalog::new();
        catalog
            .expect_find_matching()
            .withf(move |query| query.filter == filter)
            .returning(|_| Ok(vec![product(1, "Shampoo", true, false)]));
        catalog
            .expect_sample()
            .with(eq(filter), eq(4), always())
            .times(1)
            .returning(|_, limit, _| {
                Ok((0..limit as i64)
                    .map(|id| product(100 + id, "Face", true, false))
                    .collect())
            });

        let request = RecommendationRequest::new(
            UserProfile {
                hair_type: Some("curly".to_string()),
                vegan: true,
                ..profile()
            },
            5,
        );
        let products = recommend(&catalog, &request, &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();

        assert_eq!(products.len(), 5);
        assert_eq!(products[0].id, 1);
        // Backfill is unrestricted by category
        assert!(products[1..]
            .iter()
            .all(|p| p.category.as_deref() == Some("Face")));
        assert!(products.iter().all(|p| p.vegan));
    }

    #[tokio::test]
    async fn test_backfill_overshoot_is_truncated() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_find_matching()
            .returning(|_| Ok(vec![product(1, "Skincare", false, false)]));
        catalog.expect_sample().returning(|_, _, _| {
            Ok((0..10).map(|id| product(id, "Body", false, false)).collect())
        });

        let request = RecommendationRequest::new(
            UserProfile {
                goal: Some("glow".to_string()),
                ..profile()
            },
            3,
        );
        let products = recommend(&catalog, &request, &mut StdRng::seed_from_u64(5))
            .await
            .unwrap();

        assert_eq!(products.len(), 3);
    }

    #[tokio::test]
    async fn test_zero_limit_skips_catalog() {
        let mut catalog = MockCatalog::new();
        catalog.expect_find_matching().never();
        catalog.expect_sample().never();

        let request = RecommendationRequest::new(profile(), 0);
        let products = recommend(&catalog, &request, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_catalog_errors_propagate() {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_find_matching()
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let request = RecommendationRequest::new(
            UserProfile {
                skin_type: Some("dry".to_string()),
                ..profile()
            },
            6,
        );
        let result = recommend(&catalog, &request, &mut StdRng::seed_from_u64(1)).await;

        tokio_test::assert_err!(result);
    }
}
