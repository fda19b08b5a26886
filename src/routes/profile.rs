use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{ProfileUpdate, User},
    routes::AppState,
    services::auth::clean_profile,
};

/// Handler returning the logged-in user's profile
pub async fn get_profile(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}

/// Handler replacing the logged-in user's profile fields
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> AppResult<Json<User>> {
    state
        .accounts
        .update_profile(auth.user.id, clean_profile(update))
        .await?;

    let user = state
        .accounts
        .find_user_by_id(auth.user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {}", auth.user.id)))?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(user))
}
