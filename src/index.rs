//! Collapsed pronunciation index.
//!
//! Derived from a finished [`SegmentStore`]: each word's segments are joined
//! into a single string key, and the inverse maps each key back to every
//! spelling that shares it (homophones). Built once per run after the store's
//! working set is complete; never maintained incrementally.

use std::collections::{BTreeSet, HashMap};

use crate::store::SegmentStore;

/// Separator used when joining segments into a key. Arbitrary but fixed;
/// segment labels never contain whitespace.
pub const SEGMENT_SEPARATOR: &str = " ";

pub struct CollapsedIndex {
    /// word → joined segment string
    collapsed: HashMap<String, String>,
    /// joined segment string → all spellings with that pronunciation
    inverted: HashMap<String, BTreeSet<String>>,
}

impl CollapsedIndex {
    /// Build both projections from the store. Words with empty sequences are
    /// skipped: they can never take part in a match.
    pub fn build(store: &SegmentStore) -> Self {
        let mut collapsed = HashMap::new();
        let mut inverted: HashMap<String, BTreeSet<String>> = HashMap::new();
        for (word, segments) in store.entries() {
            if segments.is_empty() {
                continue;
            }
            let key = segments.join(SEGMENT_SEPARATOR);
            inverted
                .entry(key.clone())
                .or_default()
                .insert(word.to_string());
            collapsed.insert(word.to_string(), key);
        }
        Self { collapsed, inverted }
    }

    /// Join a segment sequence into an index key.
    pub fn collapse(segments: &[String]) -> String {
        segments.join(SEGMENT_SEPARATOR)
    }

    /// Whether some stored word has this pronunciation.
    pub fn contains_pronunciation(&self, key: &str) -> bool {
        self.inverted.contains_key(key)
    }

    /// All spellings sharing a pronunciation, in lexicographic order.
    pub fn spellings(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.inverted.get(key)
    }

    /// Canonical spelling for a pronunciation: the lexicographic minimum of
    /// its homophone set. Deterministic across runs.
    pub fn spelling_for(&self, key: &str) -> Option<&str> {
        self.inverted
            .get(key)
            .and_then(|set| set.iter().next())
            .map(String::as_str)
    }

    /// The joined segment string for a word, if it is indexed.
    pub fn key_of(&self, word: &str) -> Option<&str> {
        self.collapsed.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::store_from;

    #[test]
    fn test_round_trip_invariant() {
        let store = store_from(&[
            ("cat", &["k", "ae", "t"]),
            ("pat", &["p", "ae", "t"]),
            ("cow", &["k", "aw"]),
        ]);
        let index = CollapsedIndex::build(&store);
        for (word, _) in store.entries() {
            let key = index.key_of(word).unwrap();
            assert!(index.spellings(key).unwrap().contains(word));
        }
    }

    #[test]
    fn test_homophones_share_a_key() {
        let store = store_from(&[
            ("sea", &["s", "iy"]),
            ("see", &["s", "iy"]),
            ("saw", &["s", "ao"]),
        ]);
        let index = CollapsedIndex::build(&store);
        assert_eq!(index.key_of("sea"), index.key_of("see"));

        let spellings = index.spellings("s iy").unwrap();
        assert_eq!(
            spellings.iter().map(String::as_str).collect::<Vec<_>>(),
            ["sea", "see"]
        );
        // Resolution picks the lexicographic minimum.
        assert_eq!(index.spelling_for("s iy"), Some("sea"));
    }

    #[test]
    fn test_empty_sequences_are_skipped() {
        let store = store_from(&[("cat", &["k", "ae", "t"]), ("1234", &[])]);
        let index = CollapsedIndex::build(&store);
        assert_eq!(index.len(), 1);
        assert_eq!(index.key_of("1234"), None);
        assert!(!index.contains_pronunciation(""));
    }
}
