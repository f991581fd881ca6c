//! Input text normalization and tokenization.
//!
//! Free-form input is massaged into pronounceable tokens before scanning:
//! digit ranges become "A to B", thousands separators are dropped, decimal
//! points become "point", remaining digit runs are spelled out in English
//! words, and sentence punctuation is padded with spaces so it tokenizes
//! separately and never sticks to a word.

const ONES: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Punctuation that gets padded with spaces.
const PUNCTUATION: [char; 6] = ['.', ',', '-', ':', '!', ';'];

/// Normalize raw input text for scanning.
pub fn normalize(input: &str) -> String {
    let text = join_digit_pairs(input, '-', " to ");
    let text = join_digit_pairs(&text, ',', "");
    let text = join_digit_pairs(&text, '.', " point ");
    let text = spell_digit_runs(&text);
    pad_punctuation(&text)
}

/// Split normalized text into tokens on whitespace, dropping empties.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Rewrite `digits <sep> digits` (chained) as digit runs joined by `joiner`.
///
/// Used for ranges (`12-34` → `12 to 34`), thousands separators (`1,234,567`
/// → `1234567`) and decimals (`3.14` → `3 point 14`). The separator is only
/// consumed between digits; elsewhere it passes through untouched.
fn join_digit_pairs(text: &str, sep: char, joiner: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        while i < chars.len() && chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
        }
        while i + 1 < chars.len() && chars[i] == sep && chars[i + 1].is_ascii_digit() {
            out.push_str(joiner);
            i += 1;
            while i < chars.len() && chars[i].is_ascii_digit() {
                out.push(chars[i]);
                i += 1;
            }
        }
    }
    out
}

/// Replace every maximal digit run with its English spelling, padded with
/// spaces. Runs too long for u64 are spelled digit by digit.
fn spell_digit_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            run.push(c);
            continue;
        }
        if !run.is_empty() {
            push_spelled(&mut out, &run);
            run.clear();
        }
        out.push(c);
    }
    if !run.is_empty() {
        push_spelled(&mut out, &run);
    }
    out
}

fn push_spelled(out: &mut String, digits: &str) {
    out.push(' ');
    match digits.parse::<u64>() {
        Ok(n) => out.push_str(&spell_number(n)),
        Err(_) => {
            let spelled: Vec<&str> = digits
                .bytes()
                .map(|b| ONES[(b - b'0') as usize])
                .collect();
            out.push_str(&spelled.join(" "));
        }
    }
    out.push(' ');
}

/// Spell a number in English words (American short scale).
pub fn spell_number(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;
    for &(value, name) in &SCALES {
        if rest >= value {
            parts.push(spell_below_thousand(rest / value));
            parts.push(name.to_string());
            rest %= value;
        }
    }
    if rest > 0 {
        parts.push(spell_below_thousand(rest));
    }
    parts.join(" ")
}

fn spell_below_thousand(n: u64) -> String {
    let mut parts: Vec<String> = Vec::new();
    if n >= 100 {
        parts.push(format!("{} hundred", ONES[(n / 100) as usize]));
    }
    let rem = n % 100;
    if rem >= 20 {
        let tens = TENS[(rem / 10) as usize].to_string();
        if rem % 10 != 0 {
            parts.push(format!("{} {}", tens, ONES[(rem % 10) as usize]));
        } else {
            parts.push(tens);
        }
    } else if rem > 0 {
        parts.push(ONES[rem as usize].to_string());
    }
    parts.join(" ")
}

fn pad_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if PUNCTUATION.contains(&c) {
            out.push(' ');
            out.push(c);
            out.push(' ');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_number() {
        assert_eq!(spell_number(0), "zero");
        assert_eq!(spell_number(7), "seven");
        assert_eq!(spell_number(15), "fifteen");
        assert_eq!(spell_number(40), "forty");
        assert_eq!(spell_number(42), "forty two");
        assert_eq!(spell_number(100), "one hundred");
        assert_eq!(spell_number(219), "two hundred nineteen");
        assert_eq!(spell_number(1_000), "one thousand");
        assert_eq!(spell_number(1_234), "one thousand two hundred thirty four");
        assert_eq!(spell_number(1_000_017), "one million seventeen");
        assert_eq!(
            spell_number(2_000_000_000),
            "two billion"
        );
    }

    #[test]
    fn test_digit_ranges() {
        assert_eq!(join_digit_pairs("pages 12-34", '-', " to "), "pages 12 to 34");
        // Non-numeric hyphens are untouched.
        assert_eq!(join_digit_pairs("well-known", '-', " to "), "well-known");
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(join_digit_pairs("1,234", ',', ""), "1234");
        assert_eq!(join_digit_pairs("1,234,567", ',', ""), "1234567");
        assert_eq!(join_digit_pairs("a, b", ',', ""), "a, b");
    }

    #[test]
    fn test_decimals() {
        assert_eq!(join_digit_pairs("pi is 3.14", '.', " point "), "pi is 3 point 14");
        assert_eq!(join_digit_pairs("end.", '.', " point "), "end.");
    }

    #[test]
    fn test_normalize_spells_and_pads() {
        let out = normalize("I saw 2 cats, maybe 3!");
        assert_eq!(
            tokenize(&out),
            ["I", "saw", "two", "cats", ",", "maybe", "three", "!"]
        );
    }

    #[test]
    fn test_normalize_number_forms() {
        let out = normalize("12-13 and 1,500 and 2.5");
        assert_eq!(
            tokenize(&out),
            [
                "twelve", "to", "thirteen", "and", "one", "thousand", "five", "hundred", "and",
                "two", "point", "five"
            ]
        );
    }

    #[test]
    fn test_overlong_digit_run_spelled_digitwise() {
        let digits = "99999999999999999999999999";
        let out = normalize(digits);
        let toks = tokenize(&out);
        assert_eq!(toks.len(), digits.len());
        assert!(toks.iter().all(|t| t == "nine"));
    }

    #[test]
    fn test_tokenize_drops_empties() {
        assert_eq!(tokenize("  a \n\n b  "), ["a", "b"]);
    }
}
