use crate::db::{Database, DbResult};
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read state of a message. Only ever moves from `Unread` to `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Unread,
    Read,
}

impl MessageStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
        }
    }
}

impl ToSql for MessageStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MessageStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "unread" => Ok(Self::Unread),
            "read" => Ok(Self::Read),
            other => Err(FromSqlError::Other(
                format!("unknown message status: {other}").into(),
            )),
        }
    }
}

/// Payload of a send request. Sender and receiver are opaque crane ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub message: String,
}

/// A stored message as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
}

impl MessageRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender_id: row.get(1)?,
            receiver_id: row.get(2)?,
            message: row.get(3)?,
            timestamp: row.get(4)?,
            status: row.get(5)?,
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, sender_id, receiver_id, message, timestamp, status FROM messages";

impl Database {
    /// Stores a new unread message stamped with the current time and
    /// returns its generated id.
    pub fn insert_message(&self, new: &NewMessage) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let timestamp = Utc::now();

        self.with_conn(|conn| {
            conn.execute(
                r#"INSERT INTO messages (id, sender_id, receiver_id, message, timestamp, status)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                params![
                    id,
                    new.sender_id,
                    new.receiver_id,
                    new.message,
                    timestamp,
                    MessageStatus::Unread
                ],
            )?;
            Ok(id)
        })
    }

    /// All messages addressed to `receiver_id`, in whatever order the store
    /// yields them.
    pub fn messages_for_receiver(&self, receiver_id: &str) -> DbResult<Vec<MessageRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE receiver_id = ?1"))?;
            let messages = stmt
                .query_map(params![receiver_id], MessageRecord::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(messages)
        })
    }

    pub fn get_message(&self, id: &Uuid) -> DbResult<Option<MessageRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
            let result = stmt.query_row(params![id.to_string()], MessageRecord::from_row);
            match result {
                Ok(record) => Ok(Some(record)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    /// Flips an unread message to read.
    ///
    /// Returns `false` when nothing changed, which covers both an unknown id
    /// and a message that was already read.
    pub fn mark_read(&self, id: &Uuid) -> DbResult<bool> {
        self.with_conn(|conn| {
            let rows = conn.execute(
                "UPDATE messages SET status = ?1 WHERE id = ?2 AND status = ?3",
                params![MessageStatus::Read, id.to_string(), MessageStatus::Unread],
            )?;
            Ok(rows > 0)
        })
    }
}
