/*!
 * The `Word` active record.
 *
 * A `Word` is a cached copy of one row of the `words` table together with
 * the keys of its translations. It remembers the store's change counter at
 * the moment it was last known to match storage; accessors of stored state
 * compare that snapshot against the store and reload the word first when
 * anything changed since.
 */

use log::debug;
use rusqlite::params;

use super::repository;
use super::translation::Translations;
use crate::database::Store;
use crate::errors::{MemoError, Result};

/// Lifecycle state of a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    /// Not saved yet, no key assigned
    Transient,
    /// Backed by a row of the store
    Persisted,
    /// The row was deleted; the in-memory copy lives on
    Deleted,
}

/// A vocabulary item bound to the store it lives in
#[derive(Debug, Clone)]
pub struct Word<'s> {
    pub(super) store: &'s Store,
    pub(super) key: Option<i64>,
    pub(super) value: String,
    pub(super) positive_answers: u32,
    pub(super) negative_answers: u32,
    pub(super) translations: Translations,
    /// Store change counter when this copy was last in sync
    pub(super) db_last_change: u64,
    pub(super) state: WordState,
}

impl<'s> Word<'s> {
    /// Create a new, empty word which isn't saved yet
    pub fn new(store: &'s Store) -> Self {
        Self {
            store,
            key: None,
            value: String::new(),
            positive_answers: 0,
            negative_answers: 0,
            translations: Translations::new(),
            db_last_change: store.change_counter(),
            state: WordState::Transient,
        }
    }

    /// Create a new unsaved word with the given value
    pub fn with_value(store: &'s Store, value: impl Into<String>) -> Self {
        let mut word = Self::new(store);
        word.set_value(value);
        word
    }

    /// Build a word from a row just read from the store
    pub(super) fn from_storage(
        store: &'s Store,
        key: i64,
        value: String,
        positive_answers: u32,
        negative_answers: u32,
        translations: Translations,
    ) -> Self {
        Self {
            store,
            key: Some(key),
            value,
            positive_answers,
            negative_answers,
            translations,
            db_last_change: store.change_counter(),
            state: WordState::Persisted,
        }
    }

    pub fn key(&self) -> Option<i64> {
        self.key
    }

    pub fn store(&self) -> &'s Store {
        self.store
    }

    pub fn state(&self) -> WordState {
        self.state
    }

    /// Store change counter when this copy was last in sync with storage
    pub fn db_last_change(&self) -> u64 {
        self.db_last_change
    }

    /// Whether the store changed since this copy was last in sync
    pub fn is_stale(&self) -> bool {
        self.store.change_counter() > self.db_last_change
    }

    /// Reload the word if the store changed since it was last in sync.
    ///
    /// Only persisted words are reloaded; unsaved and deleted words have no
    /// row to reload from and keep serving their cached fields. Returns
    /// whether a reload happened.
    pub fn refresh_if_stale(&mut self) -> Result<bool> {
        if self.state != WordState::Persisted || !self.is_stale() {
            return Ok(false);
        }

        debug!(
            "Word {:?} is stale ({} < {}), reloading",
            self.key,
            self.db_last_change,
            self.store.change_counter()
        );
        self.reload()?;
        Ok(true)
    }

    pub fn value(&mut self) -> Result<&str> {
        self.refresh_if_stale()?;
        Ok(&self.value)
    }

    pub fn positive_answers(&mut self) -> Result<u32> {
        self.refresh_if_stale()?;
        Ok(self.positive_answers)
    }

    pub fn negative_answers(&mut self) -> Result<u32> {
        self.refresh_if_stale()?;
        Ok(self.negative_answers)
    }

    /// Keys of the words this one translates to
    pub fn translations(&mut self) -> Result<&Translations> {
        self.refresh_if_stale()?;
        Ok(&self.translations)
    }

    /// Replace the cached value. Nothing is written until `save` or `update`.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_positive_answers(&mut self, answers: u32) {
        self.positive_answers = answers;
    }

    pub fn set_negative_answers(&mut self, answers: u32) {
        self.negative_answers = answers;
    }

    /// Count one more correct answer, starting from the current stored count
    pub fn inc_positive_answers(&mut self) -> Result<()> {
        self.refresh_if_stale()?;
        self.positive_answers = self.positive_answers.saturating_add(1);
        Ok(())
    }

    /// Count one more wrong answer, starting from the current stored count
    pub fn inc_negative_answers(&mut self) -> Result<()> {
        self.refresh_if_stale()?;
        self.negative_answers = self.negative_answers.saturating_add(1);
        Ok(())
    }

    /// Insert the word into the store.
    ///
    /// The check for an existing word with the same value and the insert
    /// aren't atomic; the store has a single writer.
    pub fn save(&mut self) -> Result<()> {
        if self.state != WordState::Transient {
            return Err(MemoError::InvalidState(format!(
                "can't save word '{}', it is already {:?}",
                self.value, self.state
            )));
        }
        if self.value.is_empty() {
            return Err(MemoError::EmptyValue);
        }
        if repository::find_by_value(self.store, &self.value)?.is_some() {
            return Err(MemoError::DuplicateValue(self.value.clone()));
        }

        self.store.execute(
            "INSERT INTO words (word, positive_answers, negative_answers) VALUES (?1, ?2, ?3)",
            params![self.value, self.positive_answers, self.negative_answers],
            None,
        )?;

        // The engine assigns the key, so read the row back.
        self.reload_by_value()
    }

    /// Write the cached value and answer counts to the word's row.
    ///
    /// The raw cached fields are written as they are; an auto-reload here
    /// would overwrite the changes about to be saved.
    pub fn update(&mut self) -> Result<()> {
        let key = self.persisted_key("update")?;

        if let Some(existing) = repository::find_by_value(self.store, &self.value)? {
            if existing.key != Some(key) {
                return Err(MemoError::DuplicateValue(self.value.clone()));
            }
        }

        let before = self.store.change_counter();
        self.store.execute(
            "UPDATE words SET word = ?1, positive_answers = ?2, negative_answers = ?3 WHERE id = ?4",
            params![self.value, self.positive_answers, self.negative_answers, key],
            None,
        )?;
        let after = self.store.change_counter();

        if after == before {
            return Err(MemoError::NotFound(format!("id {}", key)));
        }
        // Changes made by others in the meantime still have to be picked up.
        if self.db_last_change == before {
            self.db_last_change = after;
        }
        Ok(())
    }

    /// Replace the in-memory copy with the row stored under the word's key
    pub fn reload(&mut self) -> Result<()> {
        let key = self.key.ok_or_else(|| {
            MemoError::InvalidState(format!("can't reload unsaved word '{}'", self.value))
        })?;

        let fresh = repository::find_by_id(self.store, key)?
            .ok_or_else(|| MemoError::NotFound(format!("id {}", key)))?;
        *self = fresh;
        Ok(())
    }

    /// Replace the in-memory copy with the row stored under the word's value
    pub fn reload_by_value(&mut self) -> Result<()> {
        let fresh = repository::find_by_value(self.store, &self.value)?
            .ok_or_else(|| MemoError::NotFound(format!("'{}'", self.value)))?;
        *self = fresh;
        Ok(())
    }

    /// Delete the word's row.
    ///
    /// The key is kept, so a later `reload` reports the row as gone.
    pub fn delete(&mut self) -> Result<()> {
        let key = self.persisted_key("delete")?;

        self.store
            .execute("DELETE FROM words WHERE id = ?1", [key], None)?;
        self.state = WordState::Deleted;
        Ok(())
    }

    /// Key of a persisted word, or an error naming the refused operation
    pub(super) fn persisted_key(&self, operation: &str) -> Result<i64> {
        match (self.state, self.key) {
            (WordState::Persisted, Some(key)) => Ok(key),
            (state, _) => Err(MemoError::InvalidState(format!(
                "can't {} word '{}' in state {:?}",
                operation, self.value, state
            ))),
        }
    }
}
