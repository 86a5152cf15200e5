//! Data models for Spendbook entities.
//!
//! This module contains the data structures exchanged with the
//! Spendbook API:
//!
//! - `Expense`: an expense record owned by the server
//! - `NewExpense`: client-side input for create/update operations
//! - `Identity`: the signed-in user
//! - Auth and expense request/response payloads

pub mod expense;
pub mod user;

pub use expense::{
    CreateExpenseRequest, DeleteExpenseResponse, Expense, ExpenseListResponse, NewExpense,
    UpdateExpenseRequest,
};
pub use user::{AuthResponse, Identity, SigninRequest, SignupRequest};
