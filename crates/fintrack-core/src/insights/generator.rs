//! Rule-based insight generation
//!
//! Used when the remote advisor is unavailable. Rules run in a fixed order
//! and each may append one message, so identical aggregates always produce
//! identical insight lists.

use crate::stats::AggregateResult;

/// Savings rate (percent) below which spending cuts are recommended
pub const MIN_SAVINGS_RATE: f64 = 20.0;

/// Share of total spending (percent) above which a category is flagged
pub const CATEGORY_SHARE_LIMIT: f64 = 30.0;

/// Expense-to-income ratio (percent) above which the buffer is too thin
pub const BUFFER_RATIO_LIMIT: f64 = 90.0;

/// Categories that are expected to dominate a budget and are never flagged
pub const CONCENTRATION_EXEMPT: &[&str] = &["Housing"];

/// Minimum number of insights returned
const MIN_INSIGHTS: usize = 2;

const LOW_SAVINGS: &str = "Your current savings rate is below the recommended 20%. Consider reducing discretionary spending to increase your savings.";
const THIN_BUFFER: &str = "Your expenses are very close to your income. This leaves little room for unexpected costs or emergencies. Try to increase your buffer.";
const AUTOMATE_SAVINGS: &str = "Consider setting up automatic transfers to a savings account at the beginning of each month to build your emergency fund.";

/// Savings rate as a percentage of income; 0 when there is no income
pub fn savings_rate(stats: &AggregateResult) -> f64 {
    if stats.income > 0.0 {
        (stats.income - stats.expenses) / stats.income * 100.0
    } else {
        0.0
    }
}

/// Produce the ordered fallback insight list for an owner's aggregate
pub fn generate_insights(stats: &AggregateResult) -> Vec<String> {
    let mut insights = Vec::new();

    let rate = savings_rate(stats);
    if rate < MIN_SAVINGS_RATE {
        insights.push(LOW_SAVINGS.to_string());
    } else {
        insights.push(format!(
            "Great job! Your savings rate of {}% is above the recommended minimum of 20%.",
            percent(rate)
        ));
    }

    if let Some(top) = stats.top_category() {
        if stats.expenses > 0.0 {
            let share = top.total / stats.expenses * 100.0;
            if share > CATEGORY_SHARE_LIMIT
                && !CONCENTRATION_EXEMPT.contains(&top.category.as_str())
            {
                insights.push(format!(
                    "Your {} expenses account for {}% of your total spending, which is relatively high. Consider ways to reduce this category.",
                    top.category,
                    percent(share)
                ));
            }
        }
    }

    if stats.income > 0.0 && stats.expenses > 0.0 {
        let ratio = stats.expenses / stats.income * 100.0;
        if ratio > BUFFER_RATIO_LIMIT {
            insights.push(THIN_BUFFER.to_string());
        }
    }

    if insights.len() < MIN_INSIGHTS {
        insights.push(AUTOMATE_SAVINGS.to_string());
    }

    insights
}

/// Round a percentage to a whole number for display
pub(crate) fn percent(value: f64) -> i64 {
    value.round() as i64
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
    fn test_empty_aggregate() {
        let insights = generate_insights(&AggregateResult::default());
        assert_eq!(insights, vec![LOW_SAVINGS.to_string(), AUTOMATE_SAVINGS.to_string()]);
    }

    #[test]
    fn test_savings_rate_boundary_inclusive() {
        // 800 spread across categories so no single one exceeds 30%
        let at_limit = stats(
            1000.0,
            &[
                (Category::Food, 200.0),
                (Category::Transport, 200.0),
                (Category::Utilities, 200.0),
                (Category::Shopping, 200.0),
            ],
        );
        assert_eq!(savings_rate(&at_limit), 20.0);
        let insights = generate_insights(&at_limit);
        assert_eq!(
            insights[0],
            "Great job! Your savings rate of 20% is above the recommended minimum of 20%."
        );

        let below = stats(
            1000.0,
            &[
                (Category::Food, 210.0),
                (Category::Transport, 200.0),
                (Category::Utilities, 200.0),
                (Category::Shopping, 200.0),
            ],
        );
        assert_eq!(generate_insights(&below)[0], LOW_SAVINGS);
    }

    #[test]
    fn test_category_concentration() {
        let s = stats(
            5000.0,
            &[(Category::Entertainment, 600.0), (Category::Food, 400.0)],
        );
        let insights = generate_insights(&s);
        assert_eq!(insights.len(), 2);
        assert_eq!(
            insights[1],
            "Your Entertainment expenses account for 60% of your total spending, which is relatively high. Consider ways to reduce this category."
        );
    }

    #[test]
    fn test_category_share_at_limit_not_flagged() {
        let s = stats(
            10_000.0,
            &[
                (Category::Food, 300.0),
                (Category::Transport, 300.0),
                (Category::Utilities, 200.0),
                (Category::Shopping, 200.0),
            ],
        );
        let insights = generate_insights(&s);
        assert!(insights.iter().all(|i| !i.contains("relatively high")));
        assert_eq!(insights.last().unwrap(), AUTOMATE_SAVINGS);
    }

    #[test]
    fn test_thin_buffer_yields_three_insights() {
        let s = stats(1000.0, &[(Category::Food, 950.0)]);
        let insights = generate_insights(&s);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0], LOW_SAVINGS);
        assert!(insights[1].starts_with("Your Food expenses account for 100%"));
        assert_eq!(insights[2], THIN_BUFFER);
    }

    #[test]
    fn test_ratio_exactly_ninety_not_flagged() {
        let s = stats(
            1000.0,
            &[
                (Category::Food, 300.0),
                (Category::Transport, 300.0),
                (Category::Shopping, 300.0),
            ],
        );
        assert!(!generate_insights(&s).contains(&THIN_BUFFER.to_string()));
    }

    #[test]
    fn test_length_bounds_and_determinism() {
        let cases = [
            AggregateResult::default(),
            stats(100.0, &[(Category::Other, 500.0)]),
            stats(0.0, &[(Category::Food, 10.0)]),
            stats(9000.0, &[(Category::Food, 10.0), (Category::Other, 10.0)]),
        ];
        for case in &cases {
            let first = generate_insights(case);
            assert!((2..=3).contains(&first.len()));
            assert_eq!(first, generate_insights(case));
        }
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(19.5), 20);
        assert_eq!(percent(74.4), 74);
        assert_eq!(percent(-3.6), -4);
    }
}
