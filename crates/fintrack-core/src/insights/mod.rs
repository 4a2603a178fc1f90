//! Local financial insights
//!
//! Rule-based fallbacks for the remote advisor:
//!
//! - **Generator** - a short ordered list of observations about an owner's
//!   savings rate, spending concentration and income buffer
//! - **Answers** - a single reply to a free-text question, chosen by keyword
//!
//! Both consume an [`AggregateResult`](crate::stats::AggregateResult) and are
//! pure functions of it.

pub mod answers;
pub mod generator;

pub use answers::{answer_question, dollars, QuestionKind, AFFORDABILITY_THRESHOLD};
pub use generator::{
    generate_insights, savings_rate, BUFFER_RATIO_LIMIT, CATEGORY_SHARE_LIMIT,
    CONCENTRATION_EXEMPT, MIN_SAVINGS_RATE,
};
