//! Festival synthesizer collaborator.
//!
//! Turns a word into its pronunciation: an ordered list of phonetic segment
//! labels. A single long-lived `festival` child process is driven over pipes
//! with one utterance-dump request per word; the textual dump is parsed for
//! segment names up to the `End_of_Stream_Items` sentinel.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

/// Sentinel line terminating one utterance dump on the child's stdout.
const END_OF_STREAM: &str = "End_of_Stream_Items";

/// Default per-request deadline. Festival answers small words in well under a
/// second; a stalled child must not hang the whole run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("failed to spawn synthesizer `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("failed to write synthesizer request: {0}")]
    Request(std::io::Error),

    #[error("failed to read synthesizer response: {0}")]
    Response(std::io::Error),

    #[error("synthesizer produced no response within {0:?}")]
    Timeout(Duration),

    #[error("synthesizer output stream ended unexpectedly")]
    Eof,
}

/// Word-to-segment synthesis seam.
///
/// Implementations return speech segments only: leading and trailing pause
/// markers are already stripped. Input containing no alphabetic character
/// yields an empty sequence without consulting the backend.
pub trait Synthesizer {
    fn segments(&mut self, text: &str) -> Result<Vec<String>, SynthError>;
}

/// A Festival child process wrapped in the [`Synthesizer`] trait.
///
/// The child's stdout is drained by a dedicated reader thread feeding a
/// channel, so each request can wait with a bounded timeout instead of
/// blocking forever on a stalled pipe.
pub struct FestivalSynth {
    child: Child,
    lines: Receiver<std::io::Result<String>>,
    timeout: Duration,
}

impl FestivalSynth {
    pub fn spawn(program: &str) -> Result<Self, SynthError> {
        Self::spawn_with_timeout(program, DEFAULT_TIMEOUT)
    }

    pub fn spawn_with_timeout(program: &str, timeout: Duration) -> Result<Self, SynthError> {
        Self::from_command(Command::new(program), timeout)
    }

    /// Spawn from a prepared `Command` (stdin/stdout are overridden to pipes).
    pub fn from_command(mut command: Command, timeout: Duration) -> Result<Self, SynthError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SynthError::Spawn {
                command: program,
                source,
            })?;

        let stdout = child.stdout.take().ok_or(SynthError::Eof)?;
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            child,
            lines: rx,
            timeout,
        })
    }
}

impl Synthesizer for FestivalSynth {
    fn segments(&mut self, text: &str) -> Result<Vec<String>, SynthError> {
        // Festival sometimes chokes on unpronounceables.
        if !text.chars().any(|c| c.is_ascii_alphabetic()) {
            return Ok(Vec::new());
        }

        let sanitized = text.replace('"', " ");
        let stdin = self.child.stdin.as_mut().ok_or(SynthError::Eof)?;
        writeln!(
            stdin,
            "(utt.save (utt.synth (Utterance Text \"{sanitized}\")) \"-\")"
        )
        .map_err(SynthError::Request)?;
        stdin.flush().map_err(SynthError::Request)?;

        let mut labels = Vec::new();
        loop {
            let line = match self.lines.recv_timeout(self.timeout) {
                Ok(Ok(line)) => line,
                Ok(Err(e)) => return Err(SynthError::Response(e)),
                Err(RecvTimeoutError::Timeout) => return Err(SynthError::Timeout(self.timeout)),
                Err(RecvTimeoutError::Disconnected) => return Err(SynthError::Eof),
            };
            if line.trim() == END_OF_STREAM {
                break;
            }
            if let Some(label) = parse_segment_label(&line) {
                labels.push(label.to_string());
            }
        }

        debug!(word = text, count = labels.len(), "synthesized segments");
        Ok(strip_pauses(labels))
    }
}

impl Drop for FestivalSynth {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Extract a segment label from one utterance-dump line.
///
/// Matches the shape `... name <label> ; dur_factor ...`; the label is the
/// text between `name ` and the following ` ; dur_factor `.
fn parse_segment_label(line: &str) -> Option<&str> {
    let rest = &line[line.find("name ")? + "name ".len()..];
    let end = rest.find(" ; dur_factor ")?;
    let label = &rest[..end];
    if label.is_empty() || label.contains(';') {
        return None;
    }
    Some(label)
}

/// Drop the leading and trailing pause markers from a raw utterance dump.
///
/// A dump with fewer than three labels carries no speech segments at all
/// (malformed or silent output) and collapses to empty.
fn strip_pauses(mut labels: Vec<String>) -> Vec<String> {
    if labels.len() <= 2 {
        return Vec::new();
    }
    labels.pop();
    labels.remove(0);
    labels
}
