/*!
 * # memo - a personal vocabulary store
 *
 * A Rust library for keeping words and their translations in an SQLite
 * database and testing yourself on them by mail.
 *
 * ## Features
 *
 * - Words with answer statistics, unique by value
 * - Symmetric translations between words
 * - Cached word records which reload themselves when the store changed
 * - Tests built from the words answered wrong most often
 * - Reply processing through an external parse script
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `database`: the store and its query layer:
 *   - `database::connection`: `Store`, the connection and its change counter
 *   - `database::result_table`: dynamically typed query results
 *   - `database::schema`: table creation
 * - `word`: words and the translation graph:
 *   - `word::record`: the `Word` active record
 *   - `word::repository`: lookups by key and value, test selection
 *   - `word::translation`: adding and checking translations
 * - `messaging`: sending tests and parsing replies
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the GNU General Public License v3 or later
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod messaging;
pub mod word;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{Cell, CellType, ResultTable, Store};
pub use errors::{MemoError, Result};
pub use word::{Translations, Word, WordState, add_word_pair};
