//! Scan drivers built on the matcher.
//!
//! Streaming mode walks a token stream and rewrites matched spans inline;
//! enumeration mode tests one word against the whole store and reports every
//! partner. Both consume a finished store and a built index.

use serde::Serialize;

use crate::index::CollapsedIndex;
use crate::matcher::spoonerize;
use crate::store::SegmentStore;

/// Cursor transition chosen at one scan position. Each variant states how
/// many tokens it consumes, which keeps the variable-step scan loop honest.
enum Step {
    /// No match here; the token passes through. Advances by 1.
    One,
    /// Adjacent-word spoonerism. Advances by 2.
    Pair { left: String, right: String },
    /// Spoonerism across a skipped middle token. Advances by 3.
    Triple { left: String, right: String },
}

impl Step {
    fn advance(&self) -> usize {
        match self {
            Step::One => 1,
            Step::Pair { .. } => 2,
            Step::Triple { .. } => 3,
        }
    }
}

/// Decide what happens at position `i`. The adjacent pair is tried first,
/// then the pair around the middle token; otherwise the token is emitted
/// unchanged.
fn classify(
    tokens: &[String],
    i: usize,
    store: &SegmentStore,
    index: &CollapsedIndex,
) -> Step {
    let seq1 = store.get(&tokens[i]).unwrap_or_default();
    let seq2 = store.get(&tokens[i + 1]).unwrap_or_default();
    if let Some(step) = resolve_pair(seq1, seq2, index, false) {
        return step;
    }

    let seq3 = store.get(&tokens[i + 2]).unwrap_or_default();
    if let Some(step) = resolve_pair(seq1, seq3, index, true) {
        return step;
    }

    Step::One
}

/// Run the matcher and resolve both pronunciation keys to canonical
/// spellings (lexicographic-minimum homophone).
fn resolve_pair(
    seq1: &[String],
    seq2: &[String],
    index: &CollapsedIndex,
    skip_one: bool,
) -> Option<Step> {
    let (key1, key2) = spoonerize(seq1, seq2, index)?;
    let left = index.spelling_for(&key1)?.to_string();
    let right = index.spelling_for(&key2)?.to_string();
    Some(if skip_one {
        Step::Triple { left, right }
    } else {
        Step::Pair { left, right }
    })
}

/// Rewrite a token stream, injecting spoonerisms inline.
///
/// Matched spans are rendered as `{"new words" (original words)}`. The scan
/// window needs two tokens of look-ahead, so the last few tokens (and any
/// stream shorter than four tokens) pass through unscanned.
pub fn scan_text(tokens: &[String], store: &SegmentStore, index: &CollapsedIndex) -> String {
    let mut out = String::new();
    let mut i = 0;

    while i + 3 < tokens.len() {
        let step = classify(tokens, i, store, index);
        match &step {
            Step::One => {
                out.push_str(&tokens[i]);
                out.push(' ');
            }
            Step::Pair { left, right } => {
                out.push_str(&format!(
                    "{{\"{left} {right}\" ({} {})}} ",
                    tokens[i],
                    tokens[i + 1]
                ));
            }
            Step::Triple { left, right } => {
                out.push_str(&format!(
                    "{{\"{left} {mid} {right}\" ({} {mid} {})}} ",
                    tokens[i],
                    tokens[i + 2],
                    mid = tokens[i + 1]
                ));
            }
        }
        i += step.advance();
    }

    // Verbatim tail: fewer tokens remain than the look-ahead window needs.
    while i < tokens.len() {
        out.push_str(&tokens[i]);
        out.push(' ');
        i += 1;
    }

    out.push('\n');
    out
}

/// One dictionary partner found for an input word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The partner word as stored.
    pub partner: String,
    /// Spellings of the first hypothetical word, sorted.
    pub left: Vec<String>,
    /// Spellings of the second hypothetical word, sorted.
    pub right: Vec<String>,
}

/// Test `seq` against every stored word and collect all matches.
///
/// Partners are visited in sorted order so reports are deterministic. An
/// input with no partners yields an empty vec, never an error.
pub fn enumerate_matches(
    seq: &[String],
    store: &SegmentStore,
    index: &CollapsedIndex,
) -> Vec<Match> {
    let mut words: Vec<(&str, &[String])> = store.entries().collect();
    words.sort_by(|a, b| a.0.cmp(b.0));

    let mut matches = Vec::new();
    for (word, segments) in words {
        if let Some((key1, key2)) = spoonerize(seq, segments, index) {
            matches.push(Match {
                partner: word.to_string(),
                left: spelling_list(index, &key1),
                right: spelling_list(index, &key2),
            });
        }
    }
    matches
}

fn spelling_list(index: &CollapsedIndex, key: &str) -> Vec<String> {
    index
        .spellings(key)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{segs, store_from, tokens};

    fn cat_pit_store() -> SegmentStore {
        store_from(&[
            ("cat", &["k", "ae", "t"]),
            ("pat", &["p", "ae", "t"]),
            ("kit", &["k", "i", "t"]),
            ("pit", &["p", "i", "t"]),
            ("the", &["dh", "ax"]),
            ("sat", &["s", "ae", "t"]),
            ("on", &["aa", "n"]),
            ("mat", &["m", "ae", "t"]),
        ])
    }

    #[test]
    fn test_short_stream_passes_through() {
        let store = cat_pit_store();
        let index = CollapsedIndex::build(&store);
        let toks = tokens(&["cat", "pit", "sat"]);
        assert_eq!(scan_text(&toks, &store, &index), "cat pit sat \n");
    }

    #[test]
    fn test_adjacent_pair_rewritten() {
        let store = cat_pit_store();
        let index = CollapsedIndex::build(&store);
        let toks = tokens(&["cat", "pit", "on", "the", "mat"]);
        let out = scan_text(&toks, &store, &index);
        assert!(
            out.starts_with("{\"pat kit\" (cat pit)} "),
            "unexpected output: {out}"
        );
        assert!(out.ends_with("on the mat \n"), "unexpected output: {out}");
    }

    #[test]
    fn test_skip_one_pair_rewritten() {
        let store = cat_pit_store();
        let index = CollapsedIndex::build(&store);
        // "cat" and "pit" match around the untouched "on".
        let toks = tokens(&["cat", "on", "pit", "the", "mat", "sat"]);
        let out = scan_text(&toks, &store, &index);
        assert!(
            out.starts_with("{\"pat on kit\" (cat on pit)} "),
            "unexpected output: {out}"
        );
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        let store = cat_pit_store();
        let index = CollapsedIndex::build(&store);
        let toks = tokens(&["xyzzy", "qwfp", "the", "on", "mat"]);
        let out = scan_text(&toks, &store, &index);
        assert_eq!(out, "xyzzy qwfp the on mat \n");
    }

    #[test]
    fn test_enumerate_finds_all_partners() {
        let store = cat_pit_store();
        let index = CollapsedIndex::build(&store);
        let matches = enumerate_matches(&segs(&["k", "ae", "t"]), &store, &index);

        let partners: Vec<&str> = matches.iter().map(|m| m.partner.as_str()).collect();
        assert!(partners.contains(&"pit"), "partners: {partners:?}");
        for m in &matches {
            assert!(!m.left.is_empty());
            assert!(!m.right.is_empty());
        }
        let pit = matches.iter().find(|m| m.partner == "pit").unwrap();
        assert_eq!(pit.left, ["pat"]);
        assert_eq!(pit.right, ["kit"]);
    }

    #[test]
    fn test_enumerate_no_partners_is_empty() {
        let store = store_from(&[("feed", &["f", "iy", "d"]), ("spoon", &["s", "p", "uw", "n"])]);
        let index = CollapsedIndex::build(&store);
        let matches = enumerate_matches(&segs(&["s", "p", "uw", "n"]), &store, &index);
        assert!(matches.is_empty());
    }
}
