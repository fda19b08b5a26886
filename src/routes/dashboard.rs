use std::sync::Arc;

use axum::{extract::State, Json};
use rand::Rng;
use serde::Serialize;

use crate::{
    error::AppResult,
    middleware::AuthUser,
    models::{ChatbotEntry, EthicsStats, Product, SearchEntry, User},
    routes::AppState,
};

const RECENT_HISTORY: usize = 5;
const FEATURED_PRODUCTS: usize = 6;
const STATS_WINDOW: usize = 100;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user: User,
    pub chatbot_history: Vec<ChatbotEntry>,
    pub search_history: Vec<SearchEntry>,
    pub product_count: i64,
    pub vegan_cf_products: Vec<Product>,
    pub vegan_cf_stats: EthicsStats,
}

/// Handler for the user's landing overview
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> AppResult<Json<DashboardResponse>> {
    let user_id = auth.user.id;
    let seed: u64 = rand::thread_rng().gen();

    let (chatbot_history, search_history, product_count, vegan_cf_products, vegan_cf_stats) =
        tokio::try_join!(
            state.accounts.chatbot_history(user_id, RECENT_HISTORY),
            state.accounts.search_history(user_id, RECENT_HISTORY),
            state.catalog.product_count(),
            state
                .catalog
                .featured_vegan_cruelty_free(FEATURED_PRODUCTS, seed),
            state.catalog.ethics_stats(),
        )?;

    Ok(Json(DashboardResponse {
        user: auth.user,
        chatbot_history,
        search_history,
        product_count,
        vegan_cf_products,
        vegan_cf_stats,
    }))
}

#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub total_chatbot_queries: usize,
    pub total_searches: usize,
}

/// Handler for activity totals over the most recent entries
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> AppResult<Json<UserStatsResponse>> {
    let (chatbot_history, search_history) = tokio::try_join!(
        state.accounts.chatbot_history(auth.user.id, STATS_WINDOW),
        state.accounts.search_history(auth.user.id, STATS_WINDOW),
    )?;

    Ok(Json(UserStatsResponse {
        total_chatbot_queries: chatbot_history.len(),
        total_searches: search_history.len(),
    }))
}
