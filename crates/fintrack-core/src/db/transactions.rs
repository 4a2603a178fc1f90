//! Transaction operations

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{trim_optional, Category, NewTransaction, Transaction, TransactionPatch};

const TRANSACTION_COLUMNS: &str = "id, user_id, name, amount, date, category, notes, created_at";

fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let category: String = row.get(5)?;
    let category = category.parse::<Category>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;
    let date: String = row.get(4)?;
    let created_at: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        amount: row.get(3)?,
        date: parse_datetime(&date),
        category,
        notes: row.get(6)?,
        created_at: parse_datetime(&created_at),
    })
}

impl Database {
    /// Insert a transaction for an owner
    ///
    /// The amount's sign is normalized from the category and a missing date
    /// defaults to now.
    pub fn insert_transaction(&self, user_id: i64, tx: &NewTransaction) -> Result<Transaction> {
        let name = tx.name.trim();
        if name.is_empty() {
            return Err(Error::validation("name", "Name is required"));
        }

        let now = Utc::now();
        let date = tx.date.unwrap_or(now);
        let amount = tx.category.signed_amount(tx.amount);
        let notes = tx.notes.as_deref().and_then(trim_optional);

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, name, amount, date, category, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                name,
                amount,
                format_datetime(&date),
                tx.category.as_str(),
                notes,
                format_datetime(&now),
            ],
        )?;
        let id = conn.last_insert_rowid();

        self.get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("transaction {}", id)))
    }

    /// List an owner's transactions, newest first
    pub fn list_transactions(&self, user_id: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC",
            TRANSACTION_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Get a transaction by ID regardless of owner
    ///
    /// Callers compare `user_id` themselves so they can tell a missing row
    /// apart from someone else's row.
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let tx = conn
            .query_row(
                &format!("SELECT {} FROM transactions WHERE id = ?", TRANSACTION_COLUMNS),
                params![id],
                row_to_transaction,
            )
            .optional()?;
        Ok(tx)
    }

    /// Apply a partial update, returning the updated row
    pub fn update_transaction(
        &self,
        id: i64,
        patch: &TransactionPatch,
    ) -> Result<Option<Transaction>> {
        let Some(mut tx) = self.get_transaction(id)? else {
            return Ok(None);
        };

        if let Some(ref name) = patch.name {
            if name.trim().is_empty() {
                return Err(Error::validation("name", "Name cannot be empty"));
            }
        }

        if patch.is_empty() {
            return Ok(Some(tx));
        }

        patch.apply(&mut tx);

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE transactions
            SET name = ?, amount = ?, date = ?, category = ?, notes = ?
            WHERE id = ?
            "#,
            params![
                tx.name,
                tx.amount,
                format_datetime(&tx.date),
                tx.category.as_str(),
                tx.notes,
                id,
            ],
        )?;

        self.get_transaction(id)
    }

    /// Delete a transaction, returning whether a row was removed
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}
