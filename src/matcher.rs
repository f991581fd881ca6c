//! Swap-pattern search over two segment sequences.
//!
//! A spoonerism swaps the leading segments of two words; the swap is valid
//! when both invented pronunciations belong to real words. Patterns are tried
//! in fixed priority order and the first hit wins: single-segment swaps are
//! the most natural, so they come first, with asymmetric and larger swaps as
//! fallback.

use crate::index::CollapsedIndex;

/// Swap patterns `(n1, n2)` in priority order: `n1` segments are taken from
/// the front of the second sequence, `n2` from the front of the first.
pub const SWAP_PATTERNS: [(usize, usize); 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

/// Search for a valid spoonerism of two segment sequences.
///
/// Returns the joined pronunciation keys of the two hypothetical words, or
/// `None` when no pattern produces a pair of known pronunciations. The keys
/// resolve back to spellings through the index.
pub fn spoonerize(
    seq1: &[String],
    seq2: &[String],
    index: &CollapsedIndex,
) -> Option<(String, String)> {
    for &(n1, n2) in &SWAP_PATTERNS {
        // Each word must keep more than one segment of its own after losing
        // its prefix; identical sequences can never spoonerize.
        if seq1.len() <= n2 + 1 || seq2.len() <= n1 + 1 || seq1 == seq2 {
            continue;
        }

        // A symmetric swap of identical prefixes would reproduce the inputs.
        if n1 == n2 && seq1[..n1] == seq2[..n1] {
            continue;
        }

        let hyp1 = [&seq2[..n1], &seq1[n2..]].concat();
        let hyp2 = [&seq1[..n2], &seq2[n1..]].concat();
        let key1 = CollapsedIndex::collapse(&hyp1);
        let key2 = CollapsedIndex::collapse(&hyp2);
        if index.contains_pronunciation(&key1) && index.contains_pronunciation(&key2) {
            return Some((key1, key2));
        }
    }
    None
}
