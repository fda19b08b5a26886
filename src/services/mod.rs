pub mod accounts;
pub mod assistant;
pub mod auth;
pub mod catalog;
pub mod recommendations;
pub mod routines;

pub use accounts::{Accounts, PgAccounts};
pub use catalog::{Catalog, PgCatalog};
