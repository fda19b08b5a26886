use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{ChatbotEntry, NewUser, ProfileUpdate, SearchEntry, User},
    services::accounts::Accounts,
};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, skin_type, hair_type, issues, goal, created_at";

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgAccounts {
    pool: PgPool,
}

impl PgAccounts {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

#[async_trait::async_trait]
impl Accounts for PgAccounts {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, password_hash, skin_type, hair_type, issues, goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.profile.skin_type)
            .bind(&user.profile.hair_type)
            .bind(&user.profile.issues)
            .bind(&user.profile.goal)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Email or username already exists".to_string())
                } else {
                    AppError::from(e)
                }
            })
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn update_profile(&self, user_id: i64, profile: ProfileUpdate) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET skin_type = $1, hair_type = $2, issues = $3, goal = $4
            WHERE id = $5
            "#,
        )
        .bind(profile.skin_type)
        .bind(profile.hair_type)
        .bind(profile.issues)
        .bind(profile.goal)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {}", user_id)));
        }

        Ok(())
    }

    async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> AppResult<Uuid> {
        let token = Uuid::new_v4();
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(token)
    }

    async fn session_user(&self, token: Uuid) -> AppResult<Option<User>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM users
            WHERE id = (
                SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()
            )
            "#,
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn delete_session(&self, token: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn save_chatbot_query(
        &self,
        user_id: i64,
        query: &str,
        response: &str,
    ) -> AppResult<()> {
        sqlx::query("INSERT INTO chatbot_history (user_id, query, response) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(query)
            .bind(response)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn chatbot_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<ChatbotEntry>> {
        let entries = sqlx::query_as::<_, ChatbotEntry>(
            r#"
            SELECT id, user_id, query, response, timestamp
            FROM chatbot_history
            WHERE user_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn save_search(&self, user_id: i64, term: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO search_history (user_id, search_term) VALUES ($1, $2)")
            .bind(user_id)
            .bind(term)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn search_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<SearchEntry>> {
        let entries = sqlx::query_as::<_, SearchEntry>(
            r#"
            SELECT id, user_id, search_term, timestamp
            FROM search_history
            WHERE user_id = $1
            ORDER BY timestamp DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
