//! User operations

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{PreferencesPatch, User, UserPreferences};

const USER_COLUMNS: &str = "id, name, email, password_hash, currency, theme, notifications, weekly_report, monthly_report, created_at";

/// Email of the implicit user when authentication is disabled
pub const LOCAL_DEV_EMAIL: &str = "local-dev@localhost";

/// Stored in place of a hash for accounts that can never log in
const UNUSABLE_PASSWORD: &str = "!";

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(9)?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        preferences: UserPreferences {
            currency: row.get(4)?,
            theme: row.get(5)?,
            notifications: row.get(6)?,
            weekly_report: row.get(7)?,
            monthly_report: row.get(8)?,
        },
        created_at: parse_datetime(&created_at),
    })
}

/// Canonical form of an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Database {
    /// Create a user with an already-hashed password
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let email = normalize_email(email);
        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::validation("email", "User already exists"));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)",
            params![name.trim(), email, password_hash],
        )?;
        let id = conn.last_insert_rowid();

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("user {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS),
                params![normalize_email(email)],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Update name and email
    ///
    /// Fails with a validation error if the new email belongs to another user.
    pub fn update_user_profile(&self, id: i64, name: &str, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        if let Some(existing) = self.get_user_by_email(&email)? {
            if existing.id != id {
                return Err(Error::validation("email", "Email is already in use"));
            }
        }

        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET name = ?, email = ? WHERE id = ?",
            params![name.trim(), email, id],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_user(id)
    }

    /// Apply a preferences patch
    pub fn update_user_preferences(
        &self,
        id: i64,
        patch: &PreferencesPatch,
    ) -> Result<Option<User>> {
        let Some(user) = self.get_user(id)? else {
            return Ok(None);
        };
        let mut prefs = user.preferences;
        patch.apply(&mut prefs);

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE users
            SET currency = ?, theme = ?, notifications = ?, weekly_report = ?, monthly_report = ?
            WHERE id = ?
            "#,
            params![
                prefs.currency,
                prefs.theme,
                prefs.notifications,
                prefs.weekly_report,
                prefs.monthly_report,
                id,
            ],
        )?;
        self.get_user(id)
    }

    /// Replace a user's password hash
    pub fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let conn = self.conn()?;
        let updated = conn.execute(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            params![password_hash, id],
        )?;
        Ok(updated > 0)
    }

    /// Get or create the single user used when authentication is disabled
    pub fn ensure_local_user(&self) -> Result<User> {
        if let Some(user) = self.get_user_by_email(LOCAL_DEV_EMAIL)? {
            return Ok(user);
        }
        self.create_user("Local Developer", LOCAL_DEV_EMAIL, UNUSABLE_PASSWORD)
    }
}
