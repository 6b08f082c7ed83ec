pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod messages;

pub use api::router;
pub use config::Config;
pub use db::Database;
