use clap::Parser;
use std::path::PathBuf;

use crate::db::{Database, DbResult};

#[derive(Parser, Debug, Clone)]
#[command(name = "crane-mailbox")]
#[command(about = "A small HTTP mailbox for passing messages between cranes")]
pub struct Config {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Location of the message store. Defaults to the platform data directory.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Config {
    /// Loads `.env` from the working directory, then parses flags and environment.
    #[must_use]
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> DbResult<PathBuf> {
        match &self.database_url {
            Some(url) => Ok(PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(url))),
            None => Database::default_path(),
        }
    }

    pub fn open_database(&self) -> DbResult<Database> {
        Database::open(self.database_path()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config =
            Config::try_parse_from(["crane-mailbox", "--host", "0.0.0.0", "-p", "9000"]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }

    #[test]
    fn sqlite_scheme_is_stripped_from_database_url() {
        let config =
            Config::try_parse_from(["crane-mailbox", "--database-url", "sqlite:///tmp/cranes.db"])
                .unwrap();
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/tmp/cranes.db")
        );
    }

    #[test]
    fn in_memory_database_url_opens() {
        let config =
            Config::try_parse_from(["crane-mailbox", "--database-url", ":memory:"]).unwrap();
        let db = config.open_database().unwrap();
        assert!(db.messages_for_receiver("anyone").unwrap().is_empty());
    }
}
