/*!
 * Store connection management.
 *
 * This module owns the SQLite connection, bootstraps the schema and keeps
 * the change counter which every cached `Word` compares against to detect
 * that it went stale.
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, info, warn};
use rusqlite::hooks::Action;
use rusqlite::{Connection, Params, ffi};

use super::result_table::{self, ResultTable};
use super::schema;
use crate::errors::{MemoError, Result};

/// The vocabulary store: a connection plus its change counter
pub struct Store {
    /// Path to the database file
    db_path: PathBuf,
    connection: Connection,
    /// Number of row-level mutations seen by the update hook
    change_counter: Arc<AtomicU64>,
}

impl Store {
    /// Open or create the store at the specified path
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| MemoError::Open {
                    path: db_path.clone(),
                    source: rusqlite::Error::SqliteFailure(
                        ffi::Error::new(ffi::SQLITE_CANTOPEN),
                        Some(format!("can't create {}: {}", parent.display(), e)),
                    ),
                })?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let connection = Connection::open(&db_path).map_err(|source| MemoError::Open {
            path: db_path.clone(),
            source,
        })?;

        Self::from_connection(connection, db_path)
    }

    /// Create a store backed by an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let connection = Connection::open_in_memory().map_err(|source| MemoError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        Self::from_connection(connection, PathBuf::from(":memory:"))
    }

    fn from_connection(connection: Connection, db_path: PathBuf) -> Result<Self> {
        schema::initialize_schema(&connection)?;

        // Installed after the bootstrap so creating tables doesn't count.
        let change_counter = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&change_counter);
        connection.update_hook(Some(
            move |action: Action, _db: &str, _table: &str, _row_id: i64| {
                if matches!(
                    action,
                    Action::SQLITE_INSERT | Action::SQLITE_UPDATE | Action::SQLITE_DELETE
                ) {
                    bump_change_counter(&counter);
                }
            },
        ));

        Ok(Self {
            db_path,
            connection,
            change_counter,
        })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Number of row-level mutations made through this store so far
    pub fn change_counter(&self) -> u64 {
        self.change_counter.load(Ordering::SeqCst)
    }

    /// Execute a query on this store's connection.
    ///
    /// Rows are copied into `sink` when one is given, see
    /// [`result_table::execute`].
    pub fn execute<P: Params>(
        &self,
        query: &str,
        params: P,
        sink: Option<&mut ResultTable>,
    ) -> Result<()> {
        result_table::execute(&self.connection, query, params, sink)
    }

    /// Execute a query and return its materialised rows
    pub fn query<P: Params>(&self, query: &str, params: P) -> Result<ResultTable> {
        let mut table = ResultTable::new();
        self.execute(query, params, Some(&mut table))?;
        Ok(table)
    }

    /// Get store statistics
    pub fn stats(&self) -> Result<StoreStats> {
        let words = self.query("SELECT COUNT(*) FROM words", [])?;
        let translations = self.query("SELECT COUNT(*) FROM translations", [])?;

        Ok(StoreStats {
            word_count: words.integer(0, 0)?,
            translation_count: translations.integer(0, 0)?,
            change_counter: self.change_counter(),
        })
    }

    /// Close the connection
    pub fn close(self) {
        info!("Closing database at: {:?}", self.db_path);
        if let Err((_, e)) = self.connection.close() {
            warn!("Failed to close database {:?} cleanly: {}", self.db_path, e);
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("db_path", &self.db_path)
            .field("change_counter", &self.change_counter())
            .finish()
    }
}

/// Called only from the update hook
fn bump_change_counter(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::SeqCst);
}

/// Store statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of stored words
    pub word_count: i64,
    /// Number of stored translation edges
    pub translation_count: i64,
    /// Mutations made since the store was opened
    pub change_counter: u64,
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Words: {}, Translations: {}, Changes this session: {}",
            self.word_count, self.translation_count, self.change_counter
        )
    }
}
