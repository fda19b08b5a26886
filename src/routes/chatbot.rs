use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;

use crate::{
    error::AppResult,
    middleware::{AuthUser, RequestId},
    models::ChatbotEntry,
    routes::AppState,
    services::assistant::{self, AssistantReply, AssistantRequest},
};

const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Handler for assistant queries
pub async fn chatbot(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    auth: AuthUser,
    Json(request): Json<AssistantRequest>,
) -> AppResult<Json<AssistantReply>> {
    tracing::info!(
        request_id = %request_id,
        user_id = auth.user.id,
        query_type = %request.query_type,
        vegan = request.profile.vegan,
        cruelty_free = request.profile.cruelty_free,
        "Processing assistant query"
    );

    let mut rng = StdRng::from_entropy();
    let reply = assistant::answer(
        state.catalog.as_ref(),
        &request,
        state.config.recommendation_limit,
        &mut rng,
    )
    .await?;

    state
        .accounts
        .save_chatbot_query(auth.user.id, &request.describe(), &reply.summary())
        .await?;

    Ok(Json(reply))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    limit: Option<usize>,
}

/// Handler listing the user's recent assistant queries
pub async fn history(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(params): Query<HistoryQuery>,
) -> AppResult<Json<Vec<ChatbotEntry>>> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT).min(100);
    let entries = state.accounts.chatbot_history(auth.user.id, limit).await?;
    Ok(Json(entries))
}
