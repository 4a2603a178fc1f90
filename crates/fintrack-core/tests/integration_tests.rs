//! Integration tests for fintrack-core
//!
//! These tests exercise the full store → aggregate → insights/answers workflow.

use std::time::Duration;

use fintrack_core::{
    aggregate,
    ai::{AdvisorClient, AdvisorConfig},
    db::Database,
    insights::{answer_question, generate_insights},
    models::{parse_date_input, Category, NewTransaction},
    Advisor, Source,
};

fn tx(name: &str, amount: f64, category: Category, date: &str) -> NewTransaction {
    NewTransaction {
        name: name.to_string(),
        amount,
        date: parse_date_input(date),
        category,
        notes: None,
    }
}

/// A quarter of activity for one user: salary each month plus spread expenses
fn seed_quarter(db: &Database) -> i64 {
    let user = db
        .create_user("Grace", "grace@example.com", "hash")
        .expect("Failed to create user");

    let rows = [
        ("Salary", 3000.0, Category::Income, "2024-01-01"),
        ("Rent share", 900.0, Category::Utilities, "2024-01-03"),
        ("Groceries", 320.5, Category::Food, "2024-01-10"),
        ("Cinema", 24.0, Category::Entertainment, "2024-01-20"),
        ("Salary", 3000.0, Category::Income, "2024-02-01"),
        ("Groceries", 280.25, Category::Food, "2024-02-11"),
        ("Metro card", 75.0, Category::Transport, "2024-02-15"),
        ("Jacket", 140.0, Category::Shopping, "2024-02-20"),
        ("Salary", 3000.0, Category::Income, "2024-03-01"),
        ("Electricity", 110.0, Category::Utilities, "2024-03-05"),
        ("Dinner out", 64.3, Category::Food, "2024-03-09"),
        ("Misc", 12.0, Category::Other, "2024-03-30"),
    ];
    for (name, amount, category, date) in rows {
        db.insert_transaction(user.id, &tx(name, amount, category, date))
            .expect("Failed to insert transaction");
    }
    user.id
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// =============================================================================
// Aggregation Integration Tests
// =============================================================================

#[test]
fn test_stats_from_stored_quarter() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let user_id = seed_quarter(&db);

    let stats = db.transaction_stats(user_id).unwrap();

    assert!(approx(stats.income, 9000.0));
    assert!(approx(stats.expenses, 1926.05));

    // Category totals sum to expenses and come largest first
    let category_sum: f64 = stats.expenses_by_category.iter().map(|c| c.total).sum();
    assert!(approx(category_sum, stats.expenses));
    assert_eq!(stats.expenses_by_category[0].category, Category::Utilities);
    assert!(stats
        .expenses_by_category
        .windows(2)
        .all(|w| w[0].total >= w[1].total));
    assert!(stats
        .expenses_by_category
        .iter()
        .all(|c| c.category != Category::Income));

    // Monthly buckets sum to income + expenses and are chronological
    let monthly_sum: f64 = stats.monthly_data.iter().map(|m| m.total).sum();
    assert!(approx(monthly_sum, stats.income + stats.expenses));
    assert_eq!(stats.monthly_data.len(), 6);
    let keys: Vec<_> = stats
        .monthly_data
        .iter()
        .map(|m| (m.year, m.month, m.is_income))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_stats_match_pure_aggregate() {
    let db = Database::in_memory().unwrap();
    let user_id = seed_quarter(&db);

    let from_store = db.transaction_stats(user_id).unwrap();
    let from_rows = aggregate(&db.list_transactions(user_id).unwrap());
    assert_eq!(from_store, from_rows);
}

#[test]
fn test_empty_owner_stats_and_insights() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("Empty", "empty@example.com", "hash").unwrap();

    let stats = db.transaction_stats(user.id).unwrap();
    assert_eq!(stats.income, 0.0);
    assert_eq!(stats.expenses, 0.0);
    assert!(stats.expenses_by_category.is_empty());
    assert!(stats.monthly_data.is_empty());

    let insights = generate_insights(&stats);
    assert_eq!(insights.len(), 2);
    assert!(insights[0].contains("below the recommended 20%"));
    assert!(insights[1].contains("automatic transfers"));
}

// =============================================================================
// Fallback Insight and Answer Tests
// =============================================================================

#[test]
fn test_quarter_insights_are_deterministic() {
    let db = Database::in_memory().unwrap();
    let user_id = seed_quarter(&db);
    let stats = db.transaction_stats(user_id).unwrap();

    let first = generate_insights(&stats);
    let second = generate_insights(&stats);
    assert_eq!(first, second);

    // 9000 in, 1926.05 out: healthy savings and Utilities at 52% of spending
    assert!(first[0].starts_with("Great job! Your savings rate of 79%"));
    assert!(first[1].starts_with("Your Utilities expenses account for 52%"));
    assert!((2..=3).contains(&first.len()));
}

#[test]
fn test_affordability_flow() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("Tight", "tight@example.com", "hash").unwrap();
    db.insert_transaction(user.id, &tx("Salary", 2000.0, Category::Income, "2024-05-01"))
        .unwrap();
    db.insert_transaction(user.id, &tx("Rent", 1850.0, Category::Other, "2024-05-02"))
        .unwrap();

    let stats = db.transaction_stats(user.id).unwrap();
    let answer = answer_question(&stats, "Can I afford a $50 purchase?");
    assert!(answer.contains("$150.00"));
    assert!(answer.ends_with("You can likely afford this purchase."));
}

#[test]
fn test_updates_flow_into_stats() {
    let db = Database::in_memory().unwrap();
    let user = db.create_user("Mover", "mover@example.com", "hash").unwrap();
    let refund = db
        .insert_transaction(user.id, &tx("Refund", 40.0, Category::Shopping, "2024-06-01"))
        .unwrap();
    assert!(approx(db.transaction_stats(user.id).unwrap().expenses, 40.0));

    // Recategorizing as income flips the stored sign and the aggregate side
    let patch = fintrack_core::TransactionPatch {
        category: Some(Category::Income),
        ..Default::default()
    };
    let updated = db.update_transaction(refund.id, &patch).unwrap().unwrap();
    assert_eq!(updated.amount, 40.0);

    let stats = db.transaction_stats(user.id).unwrap();
    assert!(approx(stats.income, 40.0));
    assert_eq!(stats.expenses, 0.0);

    db.delete_transaction(refund.id).unwrap();
    assert_eq!(db.transaction_stats(user.id).unwrap().income, 0.0);
}

// =============================================================================
// Advisor Fallback Tests
// =============================================================================

/// A local address with nothing listening on it
fn unreachable_advisor() -> AdvisorClient {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|addr| addr.port())
        .expect("Failed to reserve a port");
    AdvisorClient::remote(
        AdvisorConfig::new(&format!("http://127.0.0.1:{}", port))
            .with_timeout(Duration::from_millis(500)),
    )
    .expect("Failed to build advisor client")
}

#[tokio::test]
async fn test_unreachable_advisor_falls_back_to_local_rules() {
    let db = Database::in_memory().unwrap();
    let user_id = seed_quarter(&db);
    let remote = unreachable_advisor();
    let advisor = Advisor::new(&db, Some(&remote));

    let insights = advisor.insights(user_id).await.unwrap();
    assert_eq!(insights.source, Source::Local);
    assert_eq!(
        insights.insights,
        generate_insights(&db.transaction_stats(user_id).unwrap())
    );

    let answer = advisor
        .answer_question(user_id, "How much do I spend?")
        .await
        .unwrap();
    assert_eq!(answer.source, Source::Local);
    assert!(answer.answer.contains("Utilities"));

    let first = db.list_transactions(user_id).unwrap().remove(0);
    assert!(!advisor.mirror_transaction(&first).await);
}
