#![cfg(test)]

//! Shared fixtures for store, index, matcher and scan tests.

use std::collections::HashMap;

use crate::store::SegmentStore;
use crate::synth::{SynthError, Synthesizer, DEFAULT_TIMEOUT};

/// A synthesizer that answers from a fixed script and counts requests.
/// Words outside the script get an empty sequence, like real unknowns.
pub struct ScriptedSynth {
    script: HashMap<String, Vec<String>>,
    pub calls: usize,
}

impl ScriptedSynth {
    pub fn new(entries: &[(&str, &[&str])]) -> Self {
        let script = entries
            .iter()
            .map(|(word, segments)| {
                (
                    word.to_string(),
                    segments.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { script, calls: 0 }
    }
}

impl Synthesizer for ScriptedSynth {
    fn segments(&mut self, text: &str) -> Result<Vec<String>, SynthError> {
        self.calls += 1;
        Ok(self.script.get(text).cloned().unwrap_or_default())
    }
}

/// A synthesizer whose every request times out.
pub struct TimeoutSynth;

impl Synthesizer for TimeoutSynth {
    fn segments(&mut self, _text: &str) -> Result<Vec<String>, SynthError> {
        Err(SynthError::Timeout(DEFAULT_TIMEOUT))
    }
}

/// Build a store through the public gap-fill path.
pub fn store_from(entries: &[(&str, &[&str])]) -> SegmentStore {
    let mut synth = ScriptedSynth::new(entries);
    let mut store = SegmentStore::new();
    for (word, _) in entries {
        store
            .get_or_compute(word, &mut synth)
            .expect("scripted synth never fails");
    }
    store
}

pub fn segs(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

pub fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|s| s.to_string()).collect()
}
