//! Reporting derivations over the expense cache.
//!
//! Pure projections only: no I/O, no state, safe to recompute on every
//! render pass. Amounts are summed as `Decimal`, so totals stay exact at
//! the 2-decimal display precision.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Expense;

/// Per-category total, derived from the current cache and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Sum amounts per category, one entry per distinct category in
/// first-seen order.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for expense in expenses {
        match index.get(expense.category.as_str()) {
            Some(&i) => totals[i].total += expense.amount,
            None => {
                index.insert(&expense.category, totals.len());
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: expense.amount,
                });
            }
        }
    }

    totals
}
