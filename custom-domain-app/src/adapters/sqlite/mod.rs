//! SQLite-based domain record store using `SeaORM`.
//!
//! `SqliteStore` implements `DomainRecordRepository` against a single
//! `custom_domains` table. Uniqueness of `full_domain` and of one default per
//! owner are also enforced by indexes.

mod domain_record_repo;
pub(crate) mod entity;
mod migration;

use std::path::Path;

use custom_domain_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::Mutex;

use migration::Migrator;

/// `SQLite` store for domain records.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
    /// Serializes multi-row writes so `SQLite` never sees two competing
    /// write transactions from this process.
    pub(crate) write_lock: Mutex<()>,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and bring the schema up to date.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::info!("Opened domain store at {}", db_path.display());

        Ok(Self {
            db,
            write_lock: Mutex::new(()),
        })
    }
}
