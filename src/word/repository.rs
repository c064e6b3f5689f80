/*!
 * Lookups turning store rows into `Word`s.
 *
 * Finding nothing is not an error: single lookups return `None`. Failing
 * queries and rows that don't have the expected shape are.
 */

use log::warn;

use super::record::Word;
use super::translation::Translations;
use crate::database::{ResultTable, Store};
use crate::errors::{MemoError, Result};

const SELECT_WORDS: &str = "SELECT id, word, positive_answers, negative_answers FROM words";

/// Find the word stored under the given key
pub fn find_by_id(store: &Store, id: i64) -> Result<Option<Word<'_>>> {
    let table = store.query(&format!("{} WHERE id = ?1", SELECT_WORDS), [id])?;
    load_single(store, &table)
}

/// Find the word with exactly the given value
pub fn find_by_value<'s>(store: &'s Store, value: &str) -> Result<Option<Word<'s>>> {
    let table = store.query(&format!("{} WHERE word = ?1", SELECT_WORDS), [value])?;
    load_single(store, &table)
}

/// Find a word by value, saving a new one if there is none
pub fn find_or_create<'s>(store: &'s Store, value: &str) -> Result<Word<'s>> {
    if let Some(word) = find_by_value(store, value)? {
        return Ok(word);
    }

    let mut word = Word::with_value(store, value);
    word.save()?;
    Ok(word)
}

/// Select up to `count` words to be tested, the worst answered first.
///
/// Words are ranked by `(negative_answers + 1) / (positive_answers + 1)`, so
/// words never answered correctly still get a finite ratio. Ties go to the
/// older word.
pub fn words_to_test(store: &Store, count: usize) -> Result<Vec<Word<'_>>> {
    let limit = i64::try_from(count).unwrap_or(i64::MAX);
    let table = store.query(
        &format!(
            "{} ORDER BY (negative_answers + 1.0) / (positive_answers + 1.0) DESC, id ASC \
             LIMIT ?1",
            SELECT_WORDS
        ),
        [limit],
    )?;

    (0..table.row_count())
        .map(|row| word_from_row(store, &table, row))
        .collect()
}

fn load_single<'s>(store: &'s Store, table: &ResultTable) -> Result<Option<Word<'s>>> {
    match table.row_count() {
        0 => Ok(None),
        1 => word_from_row(store, table, 0).map(Some),
        rows => Err(MemoError::MalformedResult {
            row: 1,
            column: 0,
            message: format!("expected at most one word, got {}", rows),
        }),
    }
}

fn word_from_row<'s>(store: &'s Store, table: &ResultTable, row: usize) -> Result<Word<'s>> {
    let key = table.integer(row, 0)?;
    let value = table.text(row, 1)?.to_string();
    let positive_answers = answer_count(table, row, 2)?;
    let negative_answers = answer_count(table, row, 3)?;
    let translations = load_translations(store, key)?;

    Ok(Word::from_storage(
        store,
        key,
        value,
        positive_answers,
        negative_answers,
        translations,
    ))
}

fn answer_count(table: &ResultTable, row: usize, column: usize) -> Result<u32> {
    let count = table.integer(row, column)?;
    u32::try_from(count).map_err(|_| MemoError::MalformedResult {
        row,
        column,
        message: format!("answer count {} out of range", count),
    })
}

/// Keys of every word linked to `key`, whichever column the link is in
fn load_translations(store: &Store, key: i64) -> Result<Translations> {
    let table = store.query(
        "SELECT word_id, translation_id FROM translations \
         WHERE word_id = ?1 OR translation_id = ?1 ORDER BY id",
        [key],
    )?;

    let mut translations = Translations::new();
    for row in 0..table.row_count() {
        let word_id = table.integer(row, 0)?;
        let translation_id = table.integer(row, 1)?;
        let other = if word_id == key { translation_id } else { word_id };

        if !translations.insert(key, other) {
            warn!(
                "Skipping redundant translation {} -> {} of word {}",
                word_id, translation_id, key
            );
        }
    }
    Ok(translations)
}
