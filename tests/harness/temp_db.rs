use std::path::PathBuf;

use pricewatch::adapter::outbound::sqlite::{create_pool, run_migrations, SqliteHistoryStore};
use tempfile::TempDir;

/// File-backed SQLite database removed on drop.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("{name}.db"));
        let db = Self { _dir: dir, path };
        // Apply the schema once so every store opened later sees it.
        db.open();
        db
    }

    pub fn path(&self) -> &str {
        self.path.to_str().expect("utf-8 temp path")
    }

    /// Open a fresh store (new pool) on the same file.
    pub fn open(&self) -> SqliteHistoryStore {
        let pool = create_pool(self.path()).expect("create sqlite pool");
        run_migrations(&pool).expect("run migrations");
        SqliteHistoryStore::new(pool)
    }
}
