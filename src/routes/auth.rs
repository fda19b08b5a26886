use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Duration;

use crate::{
    error::AppResult,
    middleware::{AuthUser, RequestId},
    routes::AppState,
    services::auth::{self, LoginRequest, RegisterRequest, SessionResponse},
};

fn session_ttl(state: &AppState) -> Duration {
    Duration::hours(state.config.session_ttl_hours)
}

/// Handler for account registration
pub async fn register(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    tracing::info!(request_id = %request_id, username = %request.username, "Processing registration");

    let session = auth::register(
        state.accounts.as_ref(),
        request,
        state.config.bcrypt_cost,
        session_ttl(&state),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// Handler for login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = auth::login(state.accounts.as_ref(), request, session_ttl(&state)).await?;
    Ok(Json(session))
}

/// Handler for logout; invalidates the presented session
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> AppResult<StatusCode> {
    state.accounts.delete_session(auth.token).await?;
    tracing::info!(user_id = auth.user.id, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}
