//! Spoonerism discovery over a phonetic dictionary.
//!
//! A word is represented as an ordered sequence of pronunciation segments
//! produced by an external synthesizer ([`synth`]), cached across runs by the
//! [`store`]. A per-run reverse index ([`index`]) maps pronunciations back to
//! spellings, the [`matcher`] searches swap patterns over two sequences, and
//! the [`scan`] drivers apply the matcher to a token stream or to a whole
//! word list.
//!
//! The pipeline is a single linear pass: load the cache, fill gaps, build
//! the index, match, emit.

pub mod index;
pub mod matcher;
pub mod scan;
pub mod store;
pub mod synth;
pub mod text;
pub mod trace_init;

#[cfg(test)]
pub(crate) mod testutil;

pub use index::CollapsedIndex;
pub use matcher::{spoonerize, SWAP_PATTERNS};
pub use scan::{enumerate_matches, scan_text, Match};
pub use store::{load_word_list, SegmentStore, StoreError};
pub use synth::{FestivalSynth, SynthError, Synthesizer};
