//! Contact form submissions

use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{ContactMessage, NewContactMessage};

impl Database {
    /// Store a contact form submission
    pub fn insert_contact_message(&self, msg: &NewContactMessage) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO contact_messages (name, email, subject, message) VALUES (?, ?, ?, ?)",
            params![
                msg.name.trim(),
                msg.email.trim(),
                msg.subject.trim(),
                msg.message.trim()
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List submissions, newest first
    pub fn list_contact_messages(&self) -> Result<Vec<ContactMessage>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, email, subject, message, created_at
            FROM contact_messages
            ORDER BY created_at DESC, id DESC
            "#,
        )?;

        let messages = stmt
            .query_map([], |row| {
                let created_at: String = row.get(5)?;
                Ok(ContactMessage {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    subject: row.get(3)?,
                    message: row.get(4)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(messages)
    }
}
