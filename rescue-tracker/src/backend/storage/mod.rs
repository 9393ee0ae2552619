//! # Storage Module
//!
//! Handles all data persistence for the rescue animal tracker.
//!
//! - **connection** - SQLite connection pool lifecycle
//! - **schema** - per-kind table layout and SQL statements
//! - **traits** - the `AnimalStorage` repository abstraction
//! - **repositories** - the SQLite implementation, one instance per kind
//!
//! Domain services only see `AnimalStorage`; nothing above this module
//! touches `sqlx` directly.

pub mod connection;
pub mod repositories;
pub mod schema;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{AnimalRepository, Repositories};
pub use traits::AnimalStorage;
