/*!
 * Error types for the memo library.
 *
 * Every fallible operation of the store, the word records and the messaging
 * pipeline reports a `MemoError`, using the thiserror crate for ergonomic
 * error definitions. Lookups that find nothing return `None` instead.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while working with the vocabulary store
#[derive(Error, Debug)]
pub enum MemoError {
    /// The backing database file could not be opened
    #[error("Can't open database {path:?}: {source}")]
    Open {
        /// Path of the database file
        path: PathBuf,
        /// Error reported by SQLite
        source: rusqlite::Error,
    },

    /// The tables could not be created
    #[error("Failed to create database schema: {0}")]
    Schema(#[source] rusqlite::Error),

    /// A statement could not be prepared
    #[error("Error parsing SQL query `{query}`: {source}")]
    QueryParse {
        /// Offending query
        query: String,
        /// Error reported by SQLite
        source: rusqlite::Error,
    },

    /// Stepping through a statement failed
    #[error("Error executing statement `{query}`: {source}")]
    QueryExecution {
        /// Offending query
        query: String,
        /// Error reported by SQLite
        source: rusqlite::Error,
    },

    /// A statement could not be finalised
    #[error("Error finalising statement `{query}`: {source}")]
    QueryFinalize {
        /// Offending query
        query: String,
        /// Error reported by SQLite
        source: rusqlite::Error,
    },

    /// A result column holds something other than an integer or text
    #[error("Unsupported column type {type_name} in column {column}")]
    UnsupportedColumnType {
        /// Zero-based column index
        column: usize,
        /// SQLite's name of the offending type
        type_name: String,
    },

    /// A materialised result does not have the expected shape
    #[error("Malformed result at row {row}, column {column}: {message}")]
    MalformedResult {
        /// Zero-based row index
        row: usize,
        /// Zero-based column index
        column: usize,
        /// What was wrong with the cell
        message: String,
    },

    /// A row that had to exist is gone
    #[error("Word not found: {0}")]
    NotFound(String),

    /// Words can't be saved with an empty value
    #[error("Word value can't be empty")]
    EmptyValue,

    /// A word with this value is already stored
    #[error("Word '{0}' already exists")]
    DuplicateValue(String),

    /// The pair is already stored in either direction
    #[error("'{0}' and '{1}' are already translations of each other")]
    DuplicateTranslation(String, String),

    /// The operation doesn't apply to the word's current state
    #[error("Invalid word state: {0}")]
    InvalidState(String),

    /// The operation has no defined semantics
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// The mail pipeline failed
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// Error from an I/O operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MemoError>;
