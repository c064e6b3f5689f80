/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;

use memo::errors::MemoError;

#[test]
fn test_memoError_duplicateValue_shouldDisplayWord() {
    let error = MemoError::DuplicateValue("wąż".to_string());
    let display = format!("{}", error);
    assert!(display.contains("already exists"));
    assert!(display.contains("wąż"));
}

#[test]
fn test_memoError_duplicateTranslation_shouldDisplayBothWords() {
    let error = MemoError::DuplicateTranslation("one".to_string(), "four".to_string());
    let display = format!("{}", error);
    assert!(display.contains("'one'"));
    assert!(display.contains("'four'"));
}

#[test]
fn test_memoError_unsupportedColumnType_shouldDisplayColumnAndType() {
    let error = MemoError::UnsupportedColumnType {
        column: 2,
        type_name: "Real".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Real"));
    assert!(display.contains("column 2"));
}

#[test]
fn test_memoError_open_shouldKeepSqliteSource() {
    let error = MemoError::Open {
        path: PathBuf::from("/nonexistent/db"),
        source: rusqlite::Error::InvalidQuery,
    };
    assert!(format!("{}", error).contains("/nonexistent/db"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_memoError_fromIoError_shouldWrapCorrectly() {
    let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let error: MemoError = io_error.into();
    assert!(matches!(error, MemoError::Io(_)));
    assert!(format!("{}", error).contains("pipe closed"));
}

#[test]
fn test_memoError_intoAnyhow_shouldPreserveMessage() {
    let error: anyhow::Error = MemoError::Unimplemented("delete_translation").into();
    assert_eq!(error.to_string(), "delete_translation is not implemented");
}
