use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account together with its stored profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub skin_type: Option<String>,
    pub hair_type: Option<String>,
    pub issues: Option<String>,
    pub goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: ProfileUpdate,
}

/// Editable profile attributes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub skin_type: Option<String>,
    #[serde(default)]
    pub hair_type: Option<String>,
    #[serde(default)]
    pub issues: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// One assistant interaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct ChatbotEntry {
    pub id: i64,
    pub user_id: i64,
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

/// One product search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct SearchEntry {
    pub id: i64,
    pub user_id: i64,
    pub search_term: String,
    pub timestamp: DateTime<Utc>,
}
