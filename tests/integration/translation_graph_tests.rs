/*!
 * Translation graph scenarios
 */

use memo::errors::MemoError;
use memo::word::find_by_value;
use memo::add_word_pair;

use crate::common;

#[test]
fn test_addWordPair_scenario_shouldRejectDuplicatesInEitherDirection() {
    let (_dir, store) = common::create_test_store().unwrap();

    assert!(add_word_pair(&store, "one", "two").is_ok());
    assert!(add_word_pair(&store, "two", "three").is_ok());
    assert!(add_word_pair(&store, "one", "four").is_ok());

    assert!(matches!(
        add_word_pair(&store, "one", "four"),
        Err(MemoError::DuplicateTranslation(_, _))
    ));
    assert!(matches!(
        add_word_pair(&store, "three", "two"),
        Err(MemoError::DuplicateTranslation(_, _))
    ));

    let stats = store.stats().unwrap();
    assert_eq!(stats.word_count, 4);
    assert_eq!(stats.translation_count, 3);
}

#[test]
fn test_getTranslations_shouldFollowEdgesBothWays() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut a = common::save_word(&store, "A");
    let mut b = common::save_word(&store, "B");
    let mut c = common::save_word(&store, "C");

    a.add_translation(&mut b).unwrap();
    b.add_translation(&mut c).unwrap();

    assert_eq!(common::sorted_values(&mut b.get_translations().unwrap()), vec!["A", "C"]);
    assert_eq!(common::sorted_values(&mut a.get_translations().unwrap()), vec!["B"]);
    assert_eq!(common::sorted_values(&mut c.get_translations().unwrap()), vec!["B"]);
}

#[test]
fn test_checkTranslation_onFreshLookups_shouldBeSymmetric() {
    let (_dir, store) = common::create_test_store().unwrap();
    add_word_pair(&store, "wąż", "serpiente").unwrap();

    let snake = find_by_value(&store, "wąż").unwrap().unwrap();
    let serpiente = find_by_value(&store, "serpiente").unwrap().unwrap();
    let unrelated = common::save_word(&store, "ordenador");

    assert!(snake.check_translation(&serpiente));
    assert!(serpiente.check_translation(&snake));
    assert!(!snake.check_translation(&unrelated));
}

#[test]
fn test_cachedWord_afterTranslationAddedElsewhere_shouldReloadOnAccess() {
    let (_dir, store) = common::create_test_store().unwrap();
    let mut cached = common::save_word(&store, "kot");

    add_word_pair(&store, "kot", "gato").unwrap();

    assert_eq!(cached.translations().unwrap().len(), 1);
    let gato = find_by_value(&store, "gato").unwrap().unwrap();
    assert!(cached.check_translation(&gato));
}

#[test]
fn test_returnedTranslations_shouldBeIndependentCopies() {
    let (_dir, store) = common::create_test_store().unwrap();
    let (mut first, _) = add_word_pair(&store, "pies", "perro").unwrap();

    let mut copies = first.get_translations().unwrap();
    copies[0].set_value("changed locally");

    let mut stored = find_by_value(&store, "perro").unwrap().unwrap();
    assert_eq!(stored.value().unwrap(), "perro");
}
