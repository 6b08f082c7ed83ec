use rusqlite::{Connection, Result as SqliteResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Lock error")]
    Lock,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Process-wide handle to the message store.
///
/// Cloning is cheap; every clone shares the same connection.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens (creating if needed) the store at `path`.
    ///
    /// `:memory:` opens a private in-memory store.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn default_path() -> DbResult<PathBuf> {
        let proj_dirs =
            directories::ProjectDirs::from("", "", "crane-mailbox").ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "No home directory")
            })?;
        Ok(proj_dirs.data_dir().join("cranes.db"))
    }

    fn migrate(&self) -> DbResult<()> {
        let conn = self.conn.lock().map_err(|_| DbError::Lock)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                sender_id TEXT NOT NULL,
                receiver_id TEXT NOT NULL,
                message TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'unread'
                    CHECK (status IN ('unread', 'read'))
            );

            CREATE INDEX IF NOT EXISTS idx_messages_receiver
                ON messages(receiver_id);
            "#,
        )?;

        Ok(())
    }

    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::Lock)?;
        f(&conn).map_err(DbError::from)
    }
}
