pub mod connection;
pub mod models;
pub mod news;
pub mod pairs;
pub mod players;
pub mod rankings;
pub mod setup;
pub mod stats;

pub use connection::{create_memory_pool, create_pool, get_connection, DbConn, DbPool};
pub use models::*;

use anyhow::Result;

/// Normalised full name used as the fallback identity key
pub fn name_key(full_name: &str) -> String {
    full_name.trim().to_lowercase()
}

/// In-memory database with the schema applied
pub fn open_memory() -> Result<DbPool> {
    setup::open_pool(create_memory_pool()?)
}

/// File database at `path` with the schema applied
pub fn open(path: &str) -> Result<DbPool> {
    setup::open_pool(create_pool(path)?)
}
