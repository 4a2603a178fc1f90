//! Transaction aggregation
//!
//! Turns an owner's transactions into the summary figures used by the stats
//! endpoint and by the local insight and question fallbacks. All totals are
//! magnitudes: the category decides whether money is coming in or going out.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::error::Result;
use crate::models::{Category, Transaction};

/// Total spent in one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

/// Total for one (year, month, income/expense) bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub is_income: bool,
    pub total: f64,
}

/// Summary statistics for one owner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub income: f64,
    pub expenses: f64,
    /// Expense categories, largest first
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Chronological, expense bucket before income bucket within a month
    pub monthly_data: Vec<MonthlyTotal>,
}

impl AggregateResult {
    /// Largest expense category, if any expenses are recorded
    pub fn top_category(&self) -> Option<&CategoryTotal> {
        self.expenses_by_category.first()
    }

    /// Income minus expenses
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Aggregate a set of transactions
pub fn aggregate(transactions: &[Transaction]) -> AggregateResult {
    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut by_category: BTreeMap<&'static str, (Category, f64)> = BTreeMap::new();
    let mut by_month: BTreeMap<(i32, u32, bool), f64> = BTreeMap::new();

    for tx in transactions {
        let amount = tx.magnitude();
        if tx.is_income() {
            income += amount;
        } else {
            expenses += amount;
            by_category
                .entry(tx.category.as_str())
                .or_insert((tx.category, 0.0))
                .1 += amount;
        }

        *by_month
            .entry((tx.date.year(), tx.date.month(), tx.is_income()))
            .or_insert(0.0) += amount;
    }

    let mut expenses_by_category: Vec<CategoryTotal> = by_category
        .into_values()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    // Stable sort keeps name order (from the BTreeMap) for equal totals
    expenses_by_category.sort_by(|a, b| b.total.total_cmp(&a.total));

    let monthly_data = by_month
        .into_iter()
        .map(|((year, month, is_income), total)| MonthlyTotal {
            year,
            month,
            is_income,
            total,
        })
        .collect();

    AggregateResult {
        income,
        expenses,
        expenses_by_category,
        monthly_data,
    }
}

impl Database {
    /// Aggregate all transactions belonging to an owner
    pub fn transaction_stats(&self, user_id: i64) -> Result<AggregateResult> {
        let transactions = self.list_transactions(user_id)?;
        tracing::debug!(
            user_id,
            count = transactions.len(),
            "Aggregating transactions"
        );
        Ok(aggregate(&transactions))
    }
}
