use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{NewUser, ProfileUpdate, User},
    services::accounts::Accounts,
};

pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(flatten)]
    pub profile: ProfileUpdate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued on successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub token: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Checks required fields and password rules before anything touches storage
pub fn validate_registration(request: &RegisterRequest) -> AppResult<()> {
    if request.username.trim().is_empty()
        || request.email.trim().is_empty()
        || request.password.is_empty()
    {
        return Err(AppError::InvalidInput(
            "Please fill in all required fields".to_string(),
        ));
    }
    if request.password != request.confirm_password {
        return Err(AppError::InvalidInput("Passwords do not match".to_string()));
    }
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Blank profile strings are stored as NULL
pub fn clean_profile(profile: ProfileUpdate) -> ProfileUpdate {
    fn clean(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    ProfileUpdate {
        skin_type: clean(profile.skin_type),
        hair_type: clean(profile.hair_type),
        issues: clean(profile.issues),
        goal: clean(profile.goal),
    }
}

async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

async fn open_session(
    accounts: &dyn Accounts,
    user: User,
    session_ttl: Duration,
) -> AppResult<SessionResponse> {
    let expires_at = Utc::now() + session_ttl;
    let token = accounts.create_session(user.id, expires_at).await?;

    Ok(SessionResponse {
        token,
        expires_at,
        user,
    })
}

/// Creates an account and logs it in
pub async fn register(
    accounts: &dyn Accounts,
    request: RegisterRequest,
    bcrypt_cost: u32,
    session_ttl: Duration,
) -> AppResult<SessionResponse> {
    validate_registration(&request)?;

    let password_hash = hash_password(request.password, bcrypt_cost).await?;
    let user = accounts
        .create_user(NewUser {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            password_hash,
            profile: clean_profile(request.profile),
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    open_session(accounts, user, session_ttl).await
}

/// Verifies credentials and returns a fresh session
pub async fn login(
    accounts: &dyn Accounts,
    request: LoginRequest,
    session_ttl: Duration,
) -> AppResult<SessionResponse> {
    let email = request.email.trim();
    if email.is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput("Please fill in all fields".to_string()));
    }

    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = accounts.find_user_by_email(email).await?.ok_or_else(invalid)?;
    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = user.id, "Invalid password");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    open_session(accounts, user, session_ttl).await
}
