//! User account, session and history storage
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{ChatbotEntry, NewUser, ProfileUpdate, SearchEntry, User},
};

pub mod postgres;

pub use postgres::PgAccounts;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Accounts: Send + Sync {
    /// Inserts a user, failing with `Conflict` when the username or email is taken
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>>;

    async fn update_profile(&self, user_id: i64, profile: ProfileUpdate) -> AppResult<()>;

    async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> AppResult<Uuid>;

    /// User owning an unexpired session
    async fn session_user(&self, token: Uuid) -> AppResult<Option<User>>;

    async fn delete_session(&self, token: Uuid) -> AppResult<()>;

    async fn save_chatbot_query(&self, user_id: i64, query: &str, response: &str)
        -> AppResult<()>;

    /// Most recent interactions first
    async fn chatbot_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<ChatbotEntry>>;

    async fn save_search(&self, user_id: i64, term: &str) -> AppResult<()>;

    /// Most recent searches first
    async fn search_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<SearchEntry>>;
}
