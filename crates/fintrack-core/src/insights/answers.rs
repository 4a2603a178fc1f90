//! Keyword-based question answering
//!
//! Fallback for the remote advisor: classifies a free-text question by
//! keyword and answers it from the owner's aggregate.

use super::generator::percent;
use crate::stats::AggregateResult;

/// Savings (in currency units) above which a purchase is considered affordable
pub const AFFORDABILITY_THRESHOLD: f64 = 100.0;

const SAVINGS_TIP: &str = "Based on your spending patterns, you could save more by reducing your entertainment expenses and setting up automatic transfers to a savings account at the beginning of each month.";
const CLARIFY: &str = "I'm not sure how to answer that question. Try asking about your spending, savings, or whether you can afford a purchase.";
const NO_EXPENSES: &str = "You don't have any recorded expenses yet.";

/// What a question is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Affordability,
    Spending,
    Savings,
    Unknown,
}

impl QuestionKind {
    /// Classify by case-insensitive keyword, first match wins
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();
        if q.contains("afford") {
            Self::Affordability
        } else if q.contains("spend") {
            // also covers "spending"
            Self::Spending
        } else if q.contains("save") || q.contains("saving") {
            Self::Savings
        } else {
            Self::Unknown
        }
    }
}

/// Answer a question from an aggregate
pub fn answer_question(stats: &AggregateResult, question: &str) -> String {
    match QuestionKind::classify(question) {
        QuestionKind::Affordability => affordability_answer(stats),
        QuestionKind::Spending => spending_answer(stats),
        QuestionKind::Savings => SAVINGS_TIP.to_string(),
        QuestionKind::Unknown => CLARIFY.to_string(),
    }
}

fn affordability_answer(stats: &AggregateResult) -> String {
    let savings = stats.net();
    let verdict = if savings > AFFORDABILITY_THRESHOLD {
        "You can likely afford this purchase."
    } else {
        "You might want to reconsider this purchase to maintain your budget."
    };
    format!(
        "Based on your current financial situation, you have {} available for spending. {}",
        dollars(savings),
        verdict
    )
}

fn spending_answer(stats: &AggregateResult) -> String {
    let Some(top) = stats.top_category() else {
        return NO_EXPENSES.to_string();
    };

    let total: f64 = stats
        .expenses_by_category
        .iter()
        .map(|c| c.total.abs())
        .sum();
    if total <= 0.0 {
        return NO_EXPENSES.to_string();
    }

    format!(
        "Your highest spending category is {} at {}. This represents about {}% of your total expenses.",
        top.category,
        dollars(top.total.abs()),
        percent(top.total.abs() / total * 100.0)
    )
}

/// Format an amount as dollars with two decimals, sign before the symbol
pub fn dollars(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::stats::CategoryTotal;

    fn stats(income: f64, categories: &[(Category, f64)]) -> AggregateResult {
        AggregateResult {
            income,
            expenses: categories.iter().map(|(_, t)| t).sum(),
            expenses_by_category: categories
                .iter()
                .map(|&(category, total)| CategoryTotal { category, total })
                .collect(),
            monthly_data: vec![],
        }
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(
            QuestionKind::classify("Can I AFFORD to spend less?"),
            QuestionKind::Affordability
        );
        assert_eq!(
            QuestionKind::classify("Where does my spending go? I want to save"),
            QuestionKind::Spending
        );
        assert_eq!(
            QuestionKind::classify("Tips for Saving money"),
            QuestionKind::Savings
        );
        assert_eq!(QuestionKind::classify("hello"), QuestionKind::Unknown);
        assert_eq!(QuestionKind::classify(""), QuestionKind::Unknown);
    }

    #[test]
    fn test_affordability_positive() {
        let s = stats(2000.0, &[(Category::Food, 1850.0)]);
        let answer = answer_question(&s, "Can I afford a $50 purchase?");
        assert_eq!(
            answer,
            "Based on your current financial situation, you have $150.00 available for spending. You can likely afford this purchase."
        );
    }

    #[test]
    fn test_affordability_threshold_is_exclusive() {
        let s = stats(1000.0, &[(Category::Food, 900.0)]);
        let answer = answer_question(&s, "can i afford it");
        assert!(answer.contains("$100.00"));
        assert!(answer.ends_with("reconsider this purchase to maintain your budget."));
    }

    #[test]
    fn test_affordability_negative_savings() {
        let s = stats(100.0, &[(Category::Shopping, 350.5)]);
        let answer = answer_question(&s, "afford?");
        assert!(answer.contains("you have -$250.50 available"));
    }

    #[test]
    fn test_spending_top_category() {
        let s = stats(0.0, &[(Category::Food, 300.0), (Category::Transport, 100.0)]);
        let answer = answer_question(&s, "How much do I spend?");
        assert_eq!(
            answer,
            "Your highest spending category is Food at $300.00. This represents about 75% of your total expenses."
        );
    }

    #[test]
    fn test_spending_without_expenses() {
        let s = stats(500.0, &[]);
        assert_eq!(answer_question(&s, "my spending"), NO_EXPENSES);
    }

    #[test]
    fn test_savings_and_unknown() {
        let s = AggregateResult::default();
        assert_eq!(answer_question(&s, "How can I save?"), SAVINGS_TIP);
        assert_eq!(answer_question(&s, "What's the weather?"), CLARIFY);
    }
}
