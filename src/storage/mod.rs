mod codec;
mod repository;

pub use codec::*;
pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Key under which the JSON-encoded transaction list is stored.
pub const TRANSACTIONS_KEY: &str = "transactions";
