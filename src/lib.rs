//! Spendbook core - client library for a personal expense tracker.
//!
//! This crate holds the parts of the client with actual state-machine
//! and consistency concerns; the view layer (forms, routing, charts)
//! lives elsewhere and only consumes it:
//!
//! - `auth`: durable token storage and the session state machine
//! - `api`: the HTTP client for the Spendbook backend
//! - `sync`: remote CRUD with read-after-write reconciliation
//! - `report`: per-category totals for the dashboard chart
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::sync::Arc;
//! use spendbook::auth::{FileTokenStore, SessionManager};
//! use spendbook::api::ApiClient;
//! use spendbook::config::Config;
//! use spendbook::sync::ExpenseSyncEngine;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = Arc::new(FileTokenStore::new(Config::data_dir()?));
//! let mut session = SessionManager::new(store);
//! session.resolve();
//!
//! let client = ApiClient::new(&config.api_base_url)?;
//! let mut engine = ExpenseSyncEngine::new(client);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod report;
pub mod sync;

pub use api::{ApiClient, ApiError, ExpenseApi};
pub use auth::{FileTokenStore, MemoryTokenStore, SessionManager, SessionState, TokenStore};
pub use config::Config;
pub use models::{Expense, Identity, NewExpense};
pub use report::{category_totals, CategoryTotal};
pub use sync::ExpenseSyncEngine;
