use serde::{Deserialize, Serialize};

use super::EthicsFilter;

/// Free-text attributes describing what a user is looking for
///
/// Every field is optional. Blank strings are treated the same as absent ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    #[serde(default)]
    pub skin_type: Option<String>,
    #[serde(default)]
    pub hair_type: Option<String>,
    /// Comma-separated list of concerns (e.g. "acne, dark spots")
    #[serde(default)]
    pub issues: Option<String>,
    /// Free-text phrase (e.g. "clear glowing skin")
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub cruelty_free: bool,
}

impl UserProfile {
    /// Hard filter implied by the ethical sourcing preferences
    pub fn ethics_filter(&self) -> EthicsFilter {
        EthicsFilter {
            vegan: self.vegan,
            cruelty_free: self.cruelty_free,
        }
    }

    /// Skin type, lower-cased and trimmed, if non-blank
    pub fn skin_term(&self) -> Option<String> {
        normalized(self.skin_type.as_deref())
    }

    /// Hair type, lower-cased and trimmed, if non-blank
    pub fn hair_term(&self) -> Option<String> {
        normalized(self.hair_type.as_deref())
    }

    /// Keyword tokens from `issues` (comma-separated) followed by `goal` (whitespace-separated)
    pub fn keyword_tokens(&self) -> Vec<String> {
        let issues = self
            .issues
            .as_deref()
            .into_iter()
            .flat_map(|issues| issues.split(','));
        let goal = self
            .goal
            .as_deref()
            .into_iter()
            .flat_map(|goal| goal.split_whitespace());

        issues
            .chain(goal)
            .filter_map(|token| normalized(Some(token)))
            .collect()
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
}

/// A profile plus the maximum number of products to return
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    pub profile: UserProfile,
    pub limit: usize,
}

impl RecommendationRequest {
    pub fn new(profile: UserProfile, limit: usize) -> Self {
        Self { profile, limit }
    }
}
