use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use spoonerize::store::load_word_list;
use spoonerize::{scan, text, CollapsedIndex, FestivalSynth, SegmentStore, Synthesizer};

/// Unwrap a Result or print the error and exit.
macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Parser)]
#[command(
    name = "spoonerize",
    about = "Find spoonerisms: swap leading sounds between words until both results are real words"
)]
struct Cli {
    /// Enumerate dictionary partners for these words instead of scanning stdin
    #[arg(short = 'm', long = "match", num_args = 1.., value_name = "WORD")]
    match_words: Option<Vec<String>>,

    /// Dictionary file, one valid word per line
    #[arg(long, default_value = "/usr/share/dict/american-english")]
    dict: PathBuf,

    /// Persisted word-to-segment cache
    #[arg(long, default_value = "spoonerizer.cache")]
    cache: PathBuf,

    /// Synthesizer executable used for word-to-segment conversion
    #[arg(long, default_value = "festival")]
    festival: String,

    /// Per-word synthesis timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Emit enumeration results as JSON, one object per input word
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    spoonerize::trace_init::init_tracing(Path::new("."));

    let mut synth = die!(
        FestivalSynth::spawn_with_timeout(&cli.festival, Duration::from_secs(cli.timeout_secs)),
        "Could not open synthesizer: {}"
    );

    let dictionary = die!(
        load_word_list(&cli.dict),
        "Failed to read dictionary: {}"
    );

    eprint!("Loading cache... ");
    let mut store = die!(
        SegmentStore::open(&cli.cache),
        "Failed to load segment cache: {}"
    );
    eprintln!("Done.");

    eprint!("Calculating segments");
    for (i, word) in dictionary.iter().enumerate() {
        die!(
            store.get_or_compute(word, &mut synth),
            "Failed to synthesize dictionary word: {}"
        );
        if i % 500 == 0 {
            eprint!(".");
        }
    }
    eprintln!(" Done.");

    match cli.match_words {
        Some(ref words) => run_enumerate(words, &mut store, &mut synth, cli.json),
        None => run_scan(&mut store, &mut synth),
    }

    let flushed = die!(
        store.flush_if_dirty(&cli.cache),
        "Failed to save segment cache: {}"
    );
    if flushed {
        eprintln!("Saved cache.");
    }
}

/// Default mode: rewrite stdin with spoonerism spans marked inline.
fn run_scan(store: &mut SegmentStore, synth: &mut dyn Synthesizer) {
    let mut input = String::new();
    die!(
        io::stdin().read_to_string(&mut input),
        "Failed to read stdin: {}"
    );

    let tokens = text::tokenize(&text::normalize(&input));

    eprint!("Calculating extra segments for input text... ");
    for token in &tokens {
        die!(
            store.get_or_compute(token, synth),
            "Failed to synthesize input word: {}"
        );
    }
    eprintln!("Done.");

    // The index must see the full working set before any matching starts.
    let index = CollapsedIndex::build(store);
    let rewritten = scan::scan_text(&tokens, store, &index);
    print!("{rewritten}");
}

/// Word-list mode: report every dictionary partner for each input word.
fn run_enumerate(
    words: &[String],
    store: &mut SegmentStore,
    synth: &mut dyn Synthesizer,
    json: bool,
) {
    eprintln!("Spoonerizing from arguments.");

    // Resolve every input word before the index is built.
    let mut sequences: Vec<Vec<String>> = Vec::with_capacity(words.len());
    for word in words {
        let seq = die!(
            store.get_or_compute(word, synth),
            "Failed to synthesize input word: {}"
        );
        sequences.push(seq.to_vec());
    }
    let index = CollapsedIndex::build(store);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (word, seq) in words.iter().zip(&sequences) {
        eprint!("Spoonerizing {word}...");
        let matches = scan::enumerate_matches(seq, store, &index);
        die!(
            write_report(&mut out, word, &matches, json),
            "Failed to write report: {}"
        );
        eprintln!(" Done.");
    }
    die!(out.flush(), "Failed to write report: {}");
}

fn write_report(
    out: &mut impl Write,
    word: &str,
    matches: &[scan::Match],
    json: bool,
) -> io::Result<()> {
    if json {
        let report = serde_json::json!({ "word": word, "matches": matches });
        serde_json::to_writer(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{word}:")?;
    for m in matches {
        writeln!(
            out,
            "\t{} {}: {}  /  {}",
            word,
            m.partner,
            m.left.join(" "),
            m.right.join(" ")
        )?;
    }
    writeln!(out)?;
    Ok(())
}
