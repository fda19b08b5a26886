#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use skinintel_api::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        CatalogQuery, ChatbotEntry, EthicsFilter, EthicsStats, NewUser, Product, ProductSearch,
        ProfileUpdate, Review, SearchEntry, User,
    },
    routes::{create_router, AppState},
    services::{Accounts, Catalog},
};

pub fn product(
    id: i64,
    name: &str,
    category: &str,
    description: &str,
    vegan: bool,
    cruelty_free: bool,
) -> Product {
    Product {
        id,
        name: name.to_string(),
        price: Some(10.0 + id as f64),
        category: Some(category.to_string()),
        description: Some(description.to_string()),
        vegan,
        cruelty_free,
    }
}

/// A small catalog with a mix of categories and ethics flags
pub fn sample_catalog() -> Vec<Product> {
    vec![
        product(1, "Oil Control Gel Cleanser", "Cleansers", "For oily skin", true, true),
        product(2, "Oily Skin Mattifying Moisturizer", "Moisturizers", "Shine control", false, true),
        product(3, "Acne Spot Treatment", "Treatments", "Targets acne breakouts", true, true),
        product(4, "Hydrating Face Serum", "Skincare", "For dry skin", true, false),
        product(5, "Body Butter", "Body", "Rich cream for dry skin", false, false),
        product(6, "Curly Hair Defining Cream", "Styling", "Defines curly hair", true, true),
        product(7, "Curl Cleansing Shampoo", "Shampoo", "Sulfate-free for curly hair", true, true),
        product(8, "Curly Moisture Conditioner", "Conditioner", "Detangles curly hair", false, true),
        product(9, "Scalp Soothing Shampoo", "Shampoo", "Calms itchy scalp", true, false),
        product(10, "Frizz Control Serum", "Haircare", "Tames frizz", false, false),
        product(11, "Mineral Sunscreen SPF 50", "Sunscreen", "Broad spectrum", true, true),
        product(12, "Vitamin C Brightening Serum", "Skincare", "Fades dark spots", true, true),
        product(13, "Retinol Night Cream", "Moisturizers", "Smooths wrinkles", false, true),
        product(14, "Volumizing Shampoo", "Shampoo", "For fine hair", false, false),
        product(15, "Gentle Face Wash", "Face", "For sensitive skin", true, true),
    ]
}

fn shuffled(mut products: Vec<Product>, seed: u64, limit: usize) -> Vec<Product> {
    products.shuffle(&mut StdRng::seed_from_u64(seed));
    products.truncate(limit);
    products
}

/// Catalog kept in memory, evaluating predicates with the same semantics as Postgres
pub struct InMemoryCatalog {
    products: Vec<Product>,
    reviews: Vec<Review>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            reviews: Vec::new(),
        }
    }

    pub fn with_reviews(mut self, reviews: Vec<Review>) -> Self {
        self.reviews = reviews;
        self
    }
}

#[async_trait::async_trait]
impl Catalog for InMemoryCatalog {
    async fn find_matching(&self, query: &CatalogQuery) -> AppResult<Vec<Product>> {
        let matches = self
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        Ok(shuffled(matches, query.seed, query.limit))
    }

    async fn sample(
        &self,
        filter: EthicsFilter,
        limit: usize,
        seed: u64,
    ) -> AppResult<Vec<Product>> {
        let allowed = self
            .products
            .iter()
            .filter(|p| filter.allows(p))
            .cloned()
            .collect();
        Ok(shuffled(allowed, seed, limit))
    }

    async fn get_product(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    async fn reviews_for_product(&self, product_id: i64, limit: usize) -> AppResult<Vec<Review>> {
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn search(&self, search: &ProductSearch) -> AppResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| search.matches(p))
            .skip(search.offset)
            .take(search.limit)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> AppResult<Vec<String>> {
        let mut categories: Vec<String> = self
            .products
            .iter()
            .filter_map(|p| p.category.clone())
            .filter(|c| !c.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn product_count(&self) -> AppResult<i64> {
        Ok(self.products.len() as i64)
    }

    async fn ethics_stats(&self) -> AppResult<EthicsStats> {
        let count = |f: fn(&Product) -> bool| self.products.iter().filter(|p| f(p)).count() as i64;
        Ok(EthicsStats {
            vegan: count(|p| p.vegan),
            cruelty_free: count(|p| p.cruelty_free),
            both: count(|p| p.vegan && p.cruelty_free),
        })
    }
}

#[derive(Default)]
struct AccountsInner {
    users: Vec<User>,
    sessions: HashMap<Uuid, (i64, DateTime<Utc>)>,
    chatbot: Vec<ChatbotEntry>,
    searches: Vec<SearchEntry>,
}

/// Accounts store kept in memory
#[derive(Default)]
pub struct InMemoryAccounts {
    inner: RwLock<AccountsInner>,
}

#[async_trait::async_trait]
impl Accounts for InMemoryAccounts {
    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::Conflict(
                "Email or username already exists".to_string(),
            ));
        }

        let created = User {
            id: inner.users.len() as i64 + 1,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            skin_type: user.profile.skin_type,
            hair_type: user.profile.hair_type,
            issues: user.profile.issues,
            goal: user.profile.goal,
            created_at: Utc::now(),
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_profile(&self, user_id: i64, profile: ProfileUpdate) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))?;
        user.skin_type = profile.skin_type;
        user.hair_type = profile.hair_type;
        user.issues = profile.issues;
        user.goal = profile.goal;
        Ok(())
    }

    async fn create_session(&self, user_id: i64, expires_at: DateTime<Utc>) -> AppResult<Uuid> {
        let token = Uuid::new_v4();
        self.inner
            .write()
            .await
            .sessions
            .insert(token, (user_id, expires_at));
        Ok(token)
    }

    async fn session_user(&self, token: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        let user = inner
            .sessions
            .get(&token)
            .filter(|(_, expires_at)| *expires_at > Utc::now())
            .and_then(|(user_id, _)| inner.users.iter().find(|u| u.id == *user_id))
            .cloned();
        Ok(user)
    }

    async fn delete_session(&self, token: Uuid) -> AppResult<()> {
        self.inner.write().await.sessions.remove(&token);
        Ok(())
    }

    async fn save_chatbot_query(
        &self,
        user_id: i64,
        query: &str,
        response: &str,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let id = inner.chatbot.len() as i64 + 1;
        inner.chatbot.push(ChatbotEntry {
            id,
            user_id,
            query: query.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn chatbot_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<ChatbotEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .chatbot
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save_search(&self, user_id: i64, term: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let id = inner.searches.len() as i64 + 1;
        inner.searches.push(SearchEntry {
            id,
            user_id,
            search_term: term.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn search_history(&self, user_id: i64, limit: usize) -> AppResult<Vec<SearchEntry>> {
        let inner = self.inner.read().await;
        Ok(inner
            .searches
            .iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

pub fn test_config() -> Config {
    Config {
        bcrypt_cost: 4,
        ..Config::default()
    }
}

pub fn create_test_server_with(catalog: InMemoryCatalog) -> TestServer {
    let state = Arc::new(AppState::new(
        Arc::new(catalog),
        Arc::new(InMemoryAccounts::default()),
        test_config(),
    ));
    TestServer::new(create_router(state)).unwrap()
}

pub fn create_test_server() -> TestServer {
    create_test_server_with(InMemoryCatalog::new(sample_catalog()))
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

/// Registers a user and returns its session token
pub async fn register_user(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
            "confirm_password": "secret123",
            "skin_type": "oily",
            "hair_type": "curly"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}
