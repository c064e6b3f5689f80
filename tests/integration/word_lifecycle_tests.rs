/*!
 * Word lifecycle tests against a file-backed store
 */

use memo::errors::MemoError;
use memo::word::{find_by_id, find_by_value};
use memo::{Store, Word, WordState};

use crate::common;

#[test]
fn test_saveThenFind_shouldRoundTripValue() {
    let (_dir, store) = common::create_test_store().unwrap();

    for value in ["dom", "casa", "żółć", "a b c", "\"quoted\""] {
        let word = common::save_word(&store, value);
        let mut found = find_by_value(&store, value).unwrap().expect("Word should exist");

        assert_eq!(found.value().unwrap(), value);
        assert_eq!(found.key(), word.key());
        assert!(found.key().unwrap() >= 0);
    }
}

#[test]
fn test_save_withDuplicateValue_shouldKeepSingleRow() {
    let (_dir, store) = common::create_test_store().unwrap();
    common::save_word(&store, "unique");

    let mut again = Word::with_value(&store, "unique");

    assert!(matches!(again.save(), Err(MemoError::DuplicateValue(_))));
    assert_eq!(store.stats().unwrap().word_count, 1);
}

#[test]
fn test_wordsSurviveReopen_shouldKeepKeysAndCounts() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("db");

    let key = {
        let store = Store::open(&path).unwrap();
        let mut word = common::save_word(&store, "persist");
        word.set_positive_answers(7);
        word.update().unwrap();
        let key = word.key();
        store.close();
        key
    };

    let store = Store::open(&path).unwrap();
    let mut word = find_by_id(&store, key.unwrap()).unwrap().unwrap();
    assert_eq!(word.value().unwrap(), "persist");
    assert_eq!(word.positive_answers().unwrap(), 7);
}

#[test]
fn test_autoReload_afterMutationThroughStore_shouldSeeCurrentRow() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut cached = common::save_word(&store, "before");
    let snapshot = cached.db_last_change();

    store
        .execute(
            "UPDATE words SET word = 'after', negative_answers = 2 WHERE id = ?1",
            [cached.key().unwrap()],
            None,
        )
        .unwrap();

    assert!(store.change_counter() > snapshot);
    assert_eq!(cached.value().unwrap(), "after");
    assert_eq!(cached.negative_answers().unwrap(), 2);
    assert_eq!(cached.db_last_change(), store.change_counter());
}

#[test]
fn test_update_afterUnrelatedSave_shouldNotBeClobbered() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut word = common::save_word(&store, "draft");

    word.set_value("final");
    common::save_word(&store, "meanwhile");
    word.update().unwrap();

    let mut stored = find_by_id(&store, word.key().unwrap()).unwrap().unwrap();
    assert_eq!(stored.value().unwrap(), "final");
    assert_eq!(word.value().unwrap(), "final");
}

#[test]
fn test_update_afterRowDeletedElsewhere_shouldReturnNotFound() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut word = common::save_word(&store, "doomed");
    let mut other = find_by_value(&store, "doomed").unwrap().unwrap();

    other.delete().unwrap();
    word.set_negative_answers(1);

    assert!(matches!(word.update(), Err(MemoError::NotFound(_))));
    assert!(matches!(word.value(), Err(MemoError::NotFound(_))));
}

#[test]
fn test_deleteThenReload_shouldFail() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut word = common::save_word(&store, "temporary");

    word.delete().unwrap();

    assert_eq!(word.state(), WordState::Deleted);
    assert!(matches!(word.reload(), Err(MemoError::NotFound(_))));
    assert!(find_by_value(&store, "temporary").unwrap().is_none());
}

#[test]
fn test_deletedKey_shouldNotBeReused() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut word = common::save_word(&store, "first");
    word.delete().unwrap();

    let replacement = common::save_word(&store, "second");

    assert_ne!(replacement.key(), word.key());
    assert!(matches!(word.reload(), Err(MemoError::NotFound(_))));
}
