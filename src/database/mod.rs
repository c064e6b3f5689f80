/*!
 * Database module for persistent storage of words and translations.
 *
 * This module provides the SQLite-backed store:
 * - `connection`: the `Store` with its change counter
 * - `result_table`: generic materialisation of query results
 * - `schema`: idempotent table creation
 */

pub mod connection;
pub mod result_table;
pub mod schema;

// Re-export main types
pub use connection::{Store, StoreStats};
pub use result_table::{Cell, CellType, ResultTable};
