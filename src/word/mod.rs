/*!
 * Words and their translations.
 *
 * - `record`: the `Word` active record and its auto-reload policy
 * - `repository`: lookups building words from store rows
 * - `translation`: the symmetric translation graph between words
 */

pub mod record;
pub mod repository;
pub mod translation;

pub use record::{Word, WordState};
pub use repository::{find_by_id, find_by_value, find_or_create, words_to_test};
pub use translation::{Translations, add_word_pair};
