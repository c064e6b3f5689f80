/*!
 * Translation graph.
 *
 * Two words are translations of each other when the `translations` table
 * holds a row linking them in either direction. Each `Word` caches the keys
 * of its neighbours in a `Translations` list, in the order the edges were
 * stored.
 */

use log::warn;

use super::record::Word;
use super::repository;
use crate::database::Store;
use crate::errors::{MemoError, Result};

/// Ordered keys of a word's translations, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    keys: Vec<i64>,
}

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: i64) -> bool {
        self.keys.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.keys.iter().copied()
    }

    /// Append a neighbour of `owner`. Refuses `owner` itself and keys
    /// already present.
    pub(crate) fn insert(&mut self, owner: i64, key: i64) -> bool {
        if key == owner || self.contains(key) {
            return false;
        }
        self.keys.push(key);
        true
    }
}

impl<'s> Word<'s> {
    /// Store `other` as a translation of this word.
    ///
    /// One row is inserted; both words are reloaded afterwards so each of
    /// them lists the other.
    pub fn add_translation(&mut self, other: &mut Word<'s>) -> Result<()> {
        let own_key = self.persisted_key("add a translation to")?;
        let other_key = other.persisted_key("add as a translation")?;

        if !std::ptr::eq(self.store, other.store) {
            return Err(MemoError::InvalidState(
                "words belong to different stores".to_string(),
            ));
        }
        if own_key == other_key {
            return Err(MemoError::InvalidState(format!(
                "'{}' can't be a translation of itself",
                self.value
            )));
        }

        self.refresh_if_stale()?;
        if self.check_translation(other) {
            return Err(MemoError::DuplicateTranslation(
                self.value.clone(),
                other.value.clone(),
            ));
        }

        self.store.execute(
            "INSERT INTO translations (word_id, translation_id) VALUES (?1, ?2)",
            [own_key, other_key],
            None,
        )?;

        self.reload()?;
        other.reload()
    }

    /// Whether this word's cached translations contain `other`.
    ///
    /// Only the in-memory list is consulted; call an accessor first when the
    /// answer has to reflect the latest state of the store.
    pub fn check_translation(&self, other: &Word<'_>) -> bool {
        other
            .key
            .is_some_and(|key| self.translations.contains(key))
    }

    /// Fetch every translation of this word, in the order edges were stored.
    ///
    /// Each returned word is an independent copy. Edges whose other end was
    /// deleted are skipped.
    pub fn get_translations(&mut self) -> Result<Vec<Word<'s>>> {
        self.refresh_if_stale()?;

        let store = self.store;
        let mut words = Vec::with_capacity(self.translations.len());
        for key in self.translations.iter() {
            match repository::find_by_id(store, key)? {
                Some(word) => words.push(word),
                None => warn!(
                    "Skipping translation {} of '{}': the word no longer exists",
                    key, self.value
                ),
            }
        }
        Ok(words)
    }

    /// Removing a translation has no defined behaviour yet and always fails
    pub fn delete_translation(&mut self, _other: &mut Word<'s>) -> Result<()> {
        Err(MemoError::Unimplemented("delete_translation"))
    }
}

/// Store `second` as a translation of `first`, creating missing words
pub fn add_word_pair<'s>(
    store: &'s Store,
    first: &str,
    second: &str,
) -> Result<(Word<'s>, Word<'s>)> {
    let mut first = repository::find_or_create(store, first)?;
    let mut second = repository::find_or_create(store, second)?;
    first.add_translation(&mut second)?;
    Ok((first, second))
}
