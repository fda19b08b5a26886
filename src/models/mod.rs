pub mod product;
pub mod query;
pub mod routine;
pub mod user;
pub mod user_profile;

pub use product::{EthicsStats, Product, Review};
pub use query::{CatalogQuery, CategoryScope, Clause, EthicsFilter, ProductSearch};
pub use routine::{HaircareRoutine, Routine, RoutineStep, SkincareRoutine};
pub use user::{ChatbotEntry, NewUser, ProfileUpdate, SearchEntry, User};
pub use user_profile::{RecommendationRequest, UserProfile};
