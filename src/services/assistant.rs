use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    models::{Product, RecommendationRequest, Routine, UserProfile},
    services::{catalog::Catalog, recommendations::RecommendationPlan, routines},
};

/// What the user asked the assistant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Products,
    SkincareRoutine,
    HaircareRoutine,
    /// Unrecognized values are answered with product recommendations
    Unknown,
}

impl QueryType {
    pub fn parse(value: &str) -> Self {
        match value {
            "products" => QueryType::Products,
            "skincare_routine" => QueryType::SkincareRoutine,
            "haircare_routine" => QueryType::HaircareRoutine,
            _ => QueryType::Unknown,
        }
    }
}

fn default_query_type() -> String {
    "products".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Kept as sent so history shows exactly what was asked for
    #[serde(default = "default_query_type")]
    pub query_type: String,
}

impl AssistantRequest {
    pub fn kind(&self) -> QueryType {
        QueryType::parse(&self.query_type)
    }

    /// One-line description stored in the user's chatbot history
    pub fn describe(&self) -> String {
        let p = &self.profile;
        let field = |value: &Option<String>| value.clone().unwrap_or_default();

        let mut preferences = Vec::new();
        if p.vegan {
            preferences.push("Vegan");
        }
        if p.cruelty_free {
            preferences.push("Cruelty-Free");
        }
        let preferences = if preferences.is_empty() {
            String::new()
        } else {
            format!(", Preferences: {}", preferences.join(", "))
        };

        format!(
            "Skin: {}, Hair: {}, Issues: {}, Goal: {}, Type: {}{}",
            field(&p.skin_type),
            field(&p.hair_type),
            field(&p.issues),
            field(&p.goal),
            self.query_type,
            preferences
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routine: Option<Routine>,
}

impl AssistantReply {
    /// Short outcome recorded next to the query in history
    pub fn summary(&self) -> String {
        match (&self.products, &self.routine) {
            (Some(products), _) => format!("Recommended {} products", products.len()),
            (None, Some(Routine::Skincare(_))) => "Generated skincare routine".to_string(),
            (None, Some(Routine::Haircare(_))) => "Generated haircare routine".to_string(),
            (None, None) => String::new(),
        }
    }
}

fn filter_note(profile: &UserProfile) -> String {
    let mut tags = Vec::new();
    if profile.vegan {
        tags.push("Vegan");
    }
    if profile.cruelty_free {
        tags.push("Cruelty-Free");
    }
    if tags.is_empty() {
        String::new()
    } else {
        format!(" (Filtered: {})", tags.join(", "))
    }
}

/// Answers an assistant query with recommendations or a routine
pub async fn answer<R: Rng + Send>(
    catalog: &dyn Catalog,
    request: &AssistantRequest,
    limit: usize,
    rng: &mut R,
) -> AppResult<AssistantReply> {
    let profile = &request.profile;

    let reply = match request.kind() {
        QueryType::SkincareRoutine => AssistantReply {
            message: "Here's your personalized skincare routine!".to_string(),
            products: None,
            routine: Some(Routine::Skincare(routines::generate_skincare_routine(
                profile.skin_type.as_deref(),
                profile.issues.as_deref(),
                profile.goal.as_deref(),
            ))),
        },
        QueryType::HaircareRoutine => AssistantReply {
            message: "Here's your personalized haircare routine!".to_string(),
            products: None,
            routine: Some(Routine::Haircare(routines::generate_haircare_routine(
                profile.hair_type.as_deref(),
                profile.issues.as_deref(),
                profile.goal.as_deref(),
            ))),
        },
        query_type @ (QueryType::Products | QueryType::Unknown) => {
            let plan =
                RecommendationPlan::new(&RecommendationRequest::new(profile.clone(), limit), rng);
            let products = plan.execute(catalog).await?;

            let message = if query_type == QueryType::Products {
                format!(
                    "Based on your profile, here are {} recommended products for you!{}",
                    products.len(),
                    filter_note(profile)
                )
            } else {
                "Here are some product recommendations for you!".to_string()
            };

            AssistantReply {
                message,
                products: Some(products),
                routine: None,
            }
        }
    };

    Ok(reply)
}
