//! Domain models for Fintrack

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Transaction category
///
/// A closed set. `Income` is the only category counted as money coming in;
/// everything else is an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Shopping,
    Income,
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Food,
        Self::Transport,
        Self::Entertainment,
        Self::Utilities,
        Self::Shopping,
        Self::Income,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Entertainment => "Entertainment",
            Self::Utilities => "Utilities",
            Self::Shopping => "Shopping",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// Apply the stored sign convention: income positive, expenses negative
    pub fn signed_amount(&self, amount: f64) -> f64 {
        if self.is_income() {
            amount.abs()
        } else {
            -amount.abs()
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.trim())
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Owner of this transaction
    pub user_id: i64,
    pub name: String,
    /// Positive = income, negative = expense
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub category: Category,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.category.is_income()
    }

    /// Unsigned amount, used by every aggregate
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

/// A single invalid field in a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Input for creating a transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub name: String,
    pub amount: f64,
    /// Defaults to the creation time when absent
    pub date: Option<DateTime<Utc>>,
    pub category: Category,
    pub notes: Option<String>,
}

/// Partial update for a transaction; only present fields are applied
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub name: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub category: Option<Category>,
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.notes.is_none()
    }

    /// Apply present fields to a transaction, re-normalizing the sign
    pub fn apply(&self, tx: &mut Transaction) {
        if let Some(ref name) = self.name {
            tx.name = name.trim().to_string();
        }
        if let Some(amount) = self.amount {
            tx.amount = amount;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(ref notes) = self.notes {
            tx.notes = trim_optional(notes);
        }
        tx.amount = tx.category.signed_amount(tx.amount);
    }
}

/// Parse a client-supplied date: RFC 3339 timestamp or plain `YYYY-MM-DD`
pub fn parse_date_input(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Trim a free-text field, mapping blank input to None
pub fn trim_optional(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A registered user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
}

/// Per-user display and notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub currency: String,
    pub theme: String,
    pub notifications: bool,
    pub weekly_report: bool,
    pub monthly_report: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            theme: "light".to_string(),
            notifications: true,
            weekly_report: false,
            monthly_report: true,
        }
    }
}

/// Partial update for user preferences
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    pub currency: Option<String>,
    pub theme: Option<String>,
    pub notifications: Option<bool>,
    pub weekly_report: Option<bool>,
    pub monthly_report: Option<bool>,
}

impl PreferencesPatch {
    pub fn apply(&self, prefs: &mut UserPreferences) {
        // Blank strings leave the current value in place
        if let Some(currency) = self.currency.as_deref().and_then(trim_optional) {
            prefs.currency = currency;
        }
        if let Some(theme) = self.theme.as_deref().and_then(trim_optional) {
            prefs.theme = theme;
        }
        if let Some(v) = self.notifications {
            prefs.notifications = v;
        }
        if let Some(v) = self.weekly_report {
            prefs.weekly_report = v;
        }
        if let Some(v) = self.monthly_report {
            prefs.monthly_report = v;
        }
    }
}

/// A contact form submission
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Input for a contact form submission
#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}
