/*!
 * Common test utilities for the memo test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

use memo::{Store, Word};

/// Route library logging to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Opens a store in a fresh temporary directory.
///
/// The directory must outlive the store, so both are returned.
pub fn create_test_store() -> Result<(TempDir, Store)> {
    init_logging();
    let dir = create_temp_dir()?;
    let store = Store::open(dir.path().join("db"))?;
    Ok((dir, store))
}

/// Saves a new word with the given value
pub fn save_word<'s>(store: &'s Store, value: &str) -> Word<'s> {
    let mut word = Word::with_value(store, value);
    word.save().expect("Failed to save word");
    word
}

/// Values of the given words, sorted
pub fn sorted_values(words: &mut [Word<'_>]) -> Vec<String> {
    let mut values: Vec<String> = words
        .iter_mut()
        .map(|w| w.value().expect("Failed to read value").to_string())
        .collect();
    values.sort();
    values
}
