//! Wayfarer Storage crate - SQLite persistence for query history.
//!
//! Provides a WAL-mode SQLite database with migrations and the history
//! repository used by the HTTP layer and the CLI.

pub mod db;
pub mod migrations;
pub mod repository;

pub use db::Database;
pub use repository::HistoryRepository;
