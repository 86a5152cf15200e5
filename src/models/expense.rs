use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An expense record as stored by the server.
/// The id and timestamps are server-assigned and only known after a fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub category: String,
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-side input for creating or replacing an expense.
/// Validated by the sync engine before any network call is issued.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateExpenseRequest {
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

impl From<NewExpense> for CreateExpenseRequest {
    fn from(input: NewExpense) -> Self {
        Self {
            category: input.category,
            amount: input.amount,
            description: input.description,
        }
    }
}

/// Full replacement payload keyed by id.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateExpenseRequest {
    pub expense_id: i64,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListResponse {
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteExpenseResponse {
    #[serde(default)]
    pub message: String,
}
