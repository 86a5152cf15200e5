//! REST API module for the Spendbook backend.
//!
//! This module provides the `ApiClient` for the authentication exchange
//! and the expense endpoints, plus the `ExpenseApi` trait the sync engine
//! is written against so tests can substitute a fake server.
//!
//! The API uses JWT bearer token authentication obtained through the
//! signup/signin endpoints.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;

use async_trait::async_trait;

use crate::models::{CreateExpenseRequest, Expense, UpdateExpenseRequest};

/// The remote expense collection, as the sync engine sees it.
/// Every call carries the bearer credential for the current session.
#[async_trait]
pub trait ExpenseApi: Send + Sync {
    /// Fetch the full expense collection for the credential's user.
    async fn fetch_expenses(&self, token: &str) -> Result<Vec<Expense>, ApiError>;

    /// Create an expense; the server assigns id and timestamps.
    async fn create_expense(
        &self,
        token: &str,
        request: &CreateExpenseRequest,
    ) -> Result<Expense, ApiError>;

    /// Replace an expense's fields, keyed by id.
    async fn update_expense(
        &self,
        token: &str,
        request: &UpdateExpenseRequest,
    ) -> Result<Expense, ApiError>;

    /// Delete an expense by id.
    async fn delete_expense(&self, token: &str, id: i64) -> Result<(), ApiError>;
}
