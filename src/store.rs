//! Word → segment-sequence store with a persisted cache (SPCH format).
//!
//! The store is the single source of truth for pronunciations. It is loaded
//! once at startup, gap-filled through the synthesizer during the run, and
//! flushed back to disk at most once at the end if anything was added.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::synth::{SynthError, Synthesizer};

const MAGIC: &[u8; 4] = b"SPCH";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5; // 4 bytes magic + 1 byte version

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid cache header (too short)")]
    InvalidHeader,

    #[error("invalid cache magic bytes (expected SPCH)")]
    InvalidMagic,

    #[error("unsupported cache version: {0}")]
    UnsupportedVersion(u8),

    #[error("cache serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("cache deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error(transparent)]
    Synth(#[from] SynthError),
}

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct CacheData {
    records: Vec<CacheRecord>,
}

#[derive(Serialize, Deserialize)]
struct CacheRecord {
    word: String,
    segments: Vec<String>,
}

/// Mapping from word text to its pronunciation segments.
///
/// Entries are only ever appended, never overwritten or deleted. The dirty
/// flag records whether anything was added since load, so an unchanged store
/// skips the write on shutdown.
pub struct SegmentStore {
    segments: HashMap<String, Vec<String>>,
    dirty: bool,
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentStore {
    pub fn new() -> Self {
        Self {
            segments: HashMap::new(),
            dirty: false,
        }
    }

    /// Load the cache at `path`, or start empty if the file does not exist.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, StoreError> {
        if data.len() < HEADER_SIZE {
            return Err(StoreError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(StoreError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(StoreError::UnsupportedVersion(data[4]));
        }
        let cache: CacheData =
            bincode::deserialize(&data[HEADER_SIZE..]).map_err(StoreError::Deserialize)?;
        let segments = cache
            .records
            .into_iter()
            .map(|r| (r.word, r.segments))
            .collect();
        Ok(Self {
            segments,
            dirty: false,
        })
    }

    /// Serialize to bytes (SPCH format). Records are sorted by word so the
    /// same store always produces the same file.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut records: Vec<CacheRecord> = self
            .segments
            .iter()
            .map(|(word, segments)| CacheRecord {
                word: word.clone(),
                segments: segments.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.word.cmp(&b.word));

        let body =
            bincode::serialize(&CacheData { records }).map_err(StoreError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Return the cached segments for `word`, computing and storing them on a
    /// miss. A new entry marks the store dirty.
    ///
    /// A synthesizer timeout degrades to an empty sequence for that word (it
    /// is treated as unpronounceable) so one stuck request cannot stall the
    /// run; any other synthesizer failure propagates.
    pub fn get_or_compute(
        &mut self,
        word: &str,
        synth: &mut dyn Synthesizer,
    ) -> Result<&[String], StoreError> {
        if !self.segments.contains_key(word) {
            let computed = match synth.segments(word) {
                Ok(segments) => segments,
                Err(SynthError::Timeout(deadline)) => {
                    warn!(word, ?deadline, "synthesis timed out, storing empty sequence");
                    Vec::new()
                }
                Err(e) => return Err(e.into()),
            };
            self.segments.insert(word.to_string(), computed);
            self.dirty = true;
        }
        Ok(self
            .segments
            .get(word)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Read-only lookup; `None` for words never seen by the store.
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.segments.get(word).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.segments.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Iterate over all (word, segments) entries in arbitrary order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.segments
            .iter()
            .map(|(word, segments)| (word.as_str(), segments.as_slice()))
    }

    /// Write the cache to `path` if any entry was added since load.
    ///
    /// Returns whether a write happened. Clears the dirty flag on success, so
    /// repeated calls are no-ops.
    pub fn flush_if_dirty(&mut self, path: &Path) -> Result<bool, StoreError> {
        if !self.dirty {
            return Ok(false);
        }
        fs::write(path, self.to_bytes()?)?;
        self.dirty = false;
        Ok(true)
    }
}

/// Read a newline-delimited word list, trimming whitespace and skipping
/// empty lines.
pub fn load_word_list(path: &Path) -> Result<Vec<String>, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
