//! Transaction handlers
//!
//! Every route is owner-scoped: a transaction that exists but belongs to
//! someone else is answered with 401, a missing one with 404.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthUser;
use crate::{AppError, AppState, JsonBody, MessageResponse};
use fintrack_core::auth::Validator;
use fintrack_core::models::{
    parse_date_input, Category, FieldError, NewTransaction, Transaction, TransactionPatch,
};
use fintrack_core::stats::AggregateResult;

/// Body for creating or updating a transaction
///
/// Every field is kept as raw JSON so a missing or wrongly typed value comes
/// back as a field error instead of a deserialization failure. `null` counts
/// as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionRequest {
    pub name: Option<Value>,
    pub amount: Option<Value>,
    pub date: Option<Value>,
    pub category: Option<Value>,
    pub notes: Option<Value>,
}

/// An amount sent either as a JSON number or as a numeric string
fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Fields shared by create and update, already parsed
struct ParsedFields {
    name: Option<String>,
    amount: Option<f64>,
    date: Option<chrono::DateTime<chrono::Utc>>,
    category: Option<Category>,
    notes: Option<String>,
    errors: Vec<FieldError>,
}

fn parse_fields(req: &TransactionRequest) -> ParsedFields {
    let mut errors = Vec::new();

    // Non-string names fail the caller's required check
    let name = req.name.as_ref().and_then(Value::as_str).map(String::from);

    let amount = match &req.amount {
        Some(value) => {
            let parsed = parse_amount(value);
            if parsed.is_none() {
                errors.push(FieldError::new("amount", "Amount must be a number"));
            }
            parsed
        }
        None => None,
    };

    let date = match &req.date {
        Some(Value::String(raw)) if raw.trim().is_empty() => None,
        Some(value) => {
            let parsed = value.as_str().and_then(|raw| parse_date_input(raw.trim()));
            if parsed.is_none() {
                errors.push(FieldError::new("date", "Date must be a valid date"));
            }
            parsed
        }
        None => None,
    };

    let category = match &req.category {
        Some(value) => {
            let parsed = value.as_str().and_then(|raw| raw.parse::<Category>().ok());
            if parsed.is_none() {
                errors.push(FieldError::new("category", "Invalid category"));
            }
            parsed
        }
        None => None,
    };

    let notes = match &req.notes {
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            errors.push(FieldError::new("notes", "Notes must be text"));
            None
        }
        None => None,
    };

    ParsedFields {
        name,
        amount,
        date,
        category,
        notes,
        errors,
    }
}

/// Non-numeric ids can never name a stored row
fn transaction_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|_| AppError::not_found("Transaction not found"))
}

/// Load a transaction and check that `auth` owns it
fn owned_transaction(state: &AppState, auth: AuthUser, id: i64) -> Result<Transaction, AppError> {
    let tx = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found("Transaction not found"))?;
    if tx.user_id != auth.id {
        return Err(AppError::unauthorized("Not authorized"));
    }
    Ok(tx)
}

/// GET /api/transactions - List the owner's transactions, newest first
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = state.db.list_transactions(auth.id)?;
    Ok(Json(transactions))
}

/// POST /api/transactions - Create a transaction and mirror it to the advisor
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    JsonBody(req): JsonBody<TransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let parsed = parse_fields(&req);

    let mut validator = Validator::new();
    validator.required("name", parsed.name.as_deref(), "Name is required");
    if req.amount.is_none() {
        validator.fail("amount", "Amount is required");
    }
    if req.category.is_none() {
        validator.fail("category", "Category is required");
    }
    for error in &parsed.errors {
        validator.fail(&error.field, &error.message);
    }
    validator.finish().map_err(AppError::validation)?;

    let (Some(amount), Some(category)) = (parsed.amount, parsed.category) else {
        return Err(AppError::bad_request("Invalid transaction"));
    };

    let new = NewTransaction {
        name: parsed.name.unwrap_or_default(),
        amount,
        date: parsed.date,
        category,
        notes: parsed.notes,
    };
    let tx = state
        .db
        .insert_transaction(auth.id, &new)
        .map_err(AppError::from_core)?;

    let mirrored = state.advisor().mirror_transaction(&tx).await;
    debug!(transaction_id = tx.id, mirrored, "Created transaction");

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/stats - Aggregate totals for the owner
pub async fn transaction_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AggregateResult>, AppError> {
    let stats = state.db.transaction_stats(auth.id)?;
    Ok(Json(stats))
}

/// GET /api/transactions/:id
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Transaction>, AppError> {
    owned_transaction(&state, auth, transaction_id(id)?).map(Json)
}

/// PUT /api/transactions/:id - Apply the fields present in the body
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
    JsonBody(req): JsonBody<TransactionRequest>,
) -> Result<Json<Transaction>, AppError> {
    let id = transaction_id(id)?;
    owned_transaction(&state, auth, id)?;

    let parsed = parse_fields(&req);
    let mut validator = Validator::new();
    if req.name.is_some() {
        validator.required("name", parsed.name.as_deref(), "Name cannot be empty");
    }
    for error in &parsed.errors {
        validator.fail(&error.field, &error.message);
    }
    validator.finish().map_err(AppError::validation)?;

    let patch = TransactionPatch {
        name: parsed.name,
        amount: parsed.amount,
        date: parsed.date,
        category: parsed.category,
        notes: parsed.notes,
    };

    state
        .db
        .update_transaction(id, &patch)
        .map_err(AppError::from_core)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transaction not found"))
}

/// DELETE /api/transactions/:id
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = transaction_id(id)?;
    owned_transaction(&state, auth, id)?;

    if !state.db.delete_transaction(id)? {
        return Err(AppError::not_found("Transaction not found"));
    }
    Ok(MessageResponse::new("Transaction removed"))
}
