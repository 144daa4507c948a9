//! Migrated SQLite stores for tests.

use crate::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteHistoryStore};

/// Fresh in-memory store with the schema applied.
///
/// # Panics
/// Panics if the database cannot be created or migrated.
pub fn memory_store() -> SqliteHistoryStore {
    let pool = create_pool(":memory:").expect("create in-memory pool");
    run_migrations(&pool).expect("run migrations");
    SqliteHistoryStore::new(pool)
}
