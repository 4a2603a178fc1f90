//! Stats, insights and questions for a single user

use anyhow::{bail, Context, Result};
use fintrack_core::ai::AdvisorClient;
use fintrack_core::db::Database;
use fintrack_core::insights::{dollars, savings_rate};
use fintrack_core::stats::AggregateResult;
use fintrack_core::Advisor;

use super::resolve_user;

pub fn cmd_stats(db: &Database, user_id: Option<i64>, json: bool) -> Result<()> {
    let user = resolve_user(db, user_id)?;
    let stats = db.transaction_stats(user.id)?;

    if json {
        let out = serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    println!("💰 Stats for {} ({})", user.name, user.email);
    println!("   ─────────────────────────────");
    print!("{}", format_stats(&stats));
    Ok(())
}

/// Render an aggregate as indented lines
pub fn format_stats(stats: &AggregateResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("   Income:   {}\n", dollars(stats.income)));
    out.push_str(&format!("   Expenses: {}\n", dollars(stats.expenses)));
    out.push_str(&format!("   Net:      {}\n", dollars(stats.net())));
    out.push_str(&format!(
        "   Savings rate: {:.0}%\n",
        savings_rate(stats)
    ));

    if stats.expenses_by_category.is_empty() {
        out.push_str("\n   No expenses recorded yet.\n");
        return out;
    }

    out.push_str("\n   By category:\n");
    for entry in &stats.expenses_by_category {
        out.push_str(&format!(
            "     {:<14} {:>12}\n",
            entry.category.as_str(),
            dollars(entry.total)
        ));
    }
    out
}

pub async fn cmd_insights(
    db: &Database,
    user_id: Option<i64>,
    advisor: Option<&AdvisorClient>,
) -> Result<()> {
    let user = resolve_user(db, user_id)?;
    let insights = Advisor::new(db, advisor).insights(user.id).await?;

    println!();
    println!("💡 Insights ({})", insights.source.as_str());
    println!("   ─────────────────────────────");
    for (i, insight) in insights.insights.iter().enumerate() {
        println!("   {}. {}", i + 1, insight);
    }
    Ok(())
}

pub async fn cmd_ask(
    db: &Database,
    user_id: Option<i64>,
    question: &str,
    advisor: Option<&AdvisorClient>,
) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question is required");
    }

    let user = resolve_user(db, user_id)?;
    let answer = Advisor::new(db, advisor)
        .answer_question(user.id, question)
        .await?;

    println!();
    println!("❓ {}", question);
    println!("💬 {}", answer.answer);
    println!("   (answered by {} advisor)", answer.source.as_str());
    Ok(())
}
