/*!
 * Database schema definitions.
 *
 * Tables are created if they are missing and left alone otherwise; there is
 * no versioning or migration.
 */

use log::{debug, info};
use rusqlite::Connection;

use crate::errors::{MemoError, Result};

/// Tables every store must contain
pub const TABLES: [&str; 3] = ["words", "translations", "languages"];

/// Create all tables which don't exist yet
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    if missing_tables(conn)?.is_empty() {
        debug!("Database schema is up to date");
        return Ok(());
    }

    info!("Initializing database schema");
    create_all_tables(conn)?;
    Ok(())
}

/// Names of the expected tables absent from the database
fn missing_tables(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut missing = Vec::new();
    for table in TABLES {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [table],
                |row| row.get(0),
            )
            .map_err(MemoError::Schema)?;
        if count == 0 {
            missing.push(table);
        }
    }
    Ok(missing)
}

fn create_all_tables(conn: &Connection) -> Result<()> {
    // A word's id is never handed out again once the word is deleted.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            positive_answers INTEGER NOT NULL DEFAULT 0,
            negative_answers INTEGER NOT NULL DEFAULT 0,
            UNIQUE (word)
        );
        "#,
    )
    .map_err(MemoError::Schema)?;

    // One directed row per edge, read symmetrically.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_id INTEGER NOT NULL,
            translation_id INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_translations_word ON translations(word_id);
        CREATE INDEX IF NOT EXISTS idx_translations_translation ON translations(translation_id);
        "#,
    )
    .map_err(MemoError::Schema)?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS languages (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            UNIQUE (name)
        );
        "#,
    )
    .map_err(MemoError::Schema)?;

    info!("Database schema created successfully");
    Ok(())
}
