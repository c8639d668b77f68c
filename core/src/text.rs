//! Script-aware text cleanup for Arabic/English documents.
//!
//! Arabic normalization canonicalizes letter forms that extraction tools
//! and authors use interchangeably (Alef/Hamza variants, Yeh/Alif Maqsura,
//! Ta Marbuta) and strips Tatweel and diacritics, so that labels and
//! marker terms compare equal regardless of spelling. English cleanup is
//! limited to control characters and whitespace. Nothing here changes a
//! non-Arabic character beyond NFC, whitespace and punctuation spacing.
//!
//! All cleaning functions are idempotent.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const TATWEEL: char = '\u{0640}';

/// Returns `true` if `c` lies in the Arabic block (U+0600–U+06FF).
#[must_use]
pub fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Returns `true` if `text` contains at least one Arabic-block code point.
#[must_use]
pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(is_arabic)
}

fn is_arabic_mark(c: char) -> bool {
    matches!(c,
        '\u{0617}'..='\u{061A}'
        | '\u{064B}'..='\u{0652}'
        | '\u{06D6}'..='\u{06ED}')
}

fn canonical_arabic_letter(c: char) -> char {
    match c {
        // إ أ آ ٱ
        '\u{0625}' | '\u{0623}' | '\u{0622}' | '\u{0671}' => '\u{0627}',
        // ى
        '\u{0649}' => '\u{064A}',
        // ة
        '\u{0629}' => '\u{0647}',
        other => other,
    }
}

fn arabic_pass(text: &str) -> String {
    let composed: String = text.nfc().collect();
    let stripped: String = composed
        .chars()
        .filter(|&c| c != TATWEEL && !is_arabic_mark(c))
        .collect();
    stripped
        .nfc()
        .map(canonical_arabic_letter)
        .collect()
}

/// Normalizes Arabic letter forms and removes Tatweel and diacritics.
///
/// Text without any Arabic code point is only NFC-normalized, which makes
/// this the identity on ASCII input.
///
/// Removing a mark can expose a new canonical composition (a bare Alef
/// followed by a Madda, for instance), so the pass is repeated until the
/// text stops changing. Every pass that changes the text after the first
/// one shortens it, so the loop terminates.
#[must_use]
pub fn normalize_arabic(text: &str) -> String {
    let composed: String = text.nfc().collect();
    if !contains_arabic(&composed) {
        return composed;
    }

    let mut current = composed;
    loop {
        let next = arabic_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_controls(text: &str) -> String {
    text.chars()
        .filter(|&c| c.is_whitespace() || !(c <= '\u{1F}' || c == '\u{7F}'))
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Light cleanup for English (and any other) text: drops control
/// characters, collapses whitespace runs to a single space and trims.
///
/// Line breaks and tabs count as whitespace and become spaces.
#[must_use]
pub fn normalize_english(text: &str) -> String {
    collapse_whitespace(&strip_controls(text))
}

// The patterns below are literals and always compile.
#[allow(clippy::unwrap_used)]
fn space_before_punct() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([.,!?:؟])").unwrap())
}

fn dedup_punct(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        let repeated = prev == Some(c) && matches!(c, '.' | '!' | '?' | '؟');
        if !repeated {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Cleans mixed Arabic/English text without altering its meaning.
///
/// Applies [`normalize_arabic`] and [`normalize_english`], removes
/// whitespace in front of `. , ! ? : ؟` and collapses runs of `. ! ? ؟`.
/// Control characters are stripped before Arabic normalization so that
/// their removal cannot bring a letter and a mark together afterwards.
#[must_use]
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = strip_controls(text);
    let text = normalize_arabic(&text);
    let text = collapse_whitespace(&text);
    let text = space_before_punct().replace_all(&text, "$1");
    dedup_punct(&text).trim().to_owned()
}

/// Cleans each line with [`clean_text`], drops lines that end up empty,
/// and rejoins them with `\n`.
///
/// This is the line-preserving variant used ahead of event segmentation,
/// which works line by line.
#[must_use]
pub fn clean_document(text: &str) -> String {
    text.lines()
        .map(clean_text)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(clippy::unwrap_used)]
fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?؟]\s+").unwrap())
}

/// Splits text into cleaned sentences on `. ! ? ؟` followed by whitespace.
///
/// Line breaks are treated as spaces; empty sentences are dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<String> {
    let joined = text.replace(['\n', '\r'], " ");
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in sentence_boundary().find_iter(&joined) {
        // keep the terminator, drop the whitespace after it
        let end = m.start() + m.as_str().chars().next().map_or(1, char::len_utf8);
        sentences.push(&joined[start..end]);
        start = m.end();
    }
    sentences.push(&joined[start..]);

    sentences
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(clean_text)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Packs sentences into chunks of at most `max_len` characters.
///
/// Chunks break at sentence boundaries; a single sentence longer than
/// `max_len` becomes its own (oversized) chunk rather than being cut.
#[must_use]
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if !current.is_empty() && current_len + 1 + len > max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&sentence);
        current_len += len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[allow(clippy::unwrap_used)]
fn url_or_email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+|\S+@\S+").unwrap())
}

/// Cleans text and removes URLs and e-mail addresses, for handing to a
/// topic or theme classifier.
#[must_use]
pub fn prepare_for_topic_detection(text: &str) -> String {
    let cleaned = clean_text(text);
    collapse_whitespace(&url_or_email().replace_all(&cleaned, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_alef_yeh_and_ta_marbuta() {
        assert_eq!(normalize_arabic("أحمد"), "احمد");
        assert_eq!(normalize_arabic("إسلام"), "اسلام");
        assert_eq!(normalize_arabic("آية"), "ايه");
        assert_eq!(normalize_arabic("مستشفى"), "مستشفي");
        assert_eq!(normalize_arabic("مدرسة"), "مدرسه");
    }

    #[test]
    fn strips_tatweel_and_diacritics() {
        assert_eq!(normalize_arabic("العـــربية"), "العربيه");
        assert_eq!(normalize_arabic("هَذَا نَصّ مُخْتَبَر"), "هذا نص مختبر");
    }

    #[test]
    fn composes_before_mapping() {
        // Alef + combining Hamza above composes to أ and then maps to ا.
        assert_eq!(normalize_arabic("\u{0627}\u{0654}"), "\u{0627}");
        // Yeh + Hamza above composes to ئ, which is kept.
        assert_eq!(normalize_arabic("\u{064A}\u{0654}"), "\u{0626}");
    }

    #[test]
    fn mark_removal_exposing_composition_is_idempotent() {
        // U+06E5 separates Alef from Madda; once it is stripped they compose.
        let input = "\u{0627}\u{06E5}\u{0653}";
        let once = normalize_arabic(input);
        assert_eq!(once, "\u{0627}");
        assert_eq!(normalize_arabic(&once), once);
    }

    #[test]
    fn identity_on_ascii() {
        let s = "The  conference, held in Paris!!  (2015)";
        assert_eq!(normalize_arabic(s), s);
    }

    #[test]
    fn leaves_latin_untouched_in_mixed_text() {
        assert_eq!(normalize_arabic("Café في باريس"), "Café في باريس");
    }

    #[test]
    fn english_cleanup_collapses_whitespace_and_controls() {
        assert_eq!(normalize_english("  a\tb\n\nc\u{0007}d  "), "a b cd");
    }

    #[test]
    fn clean_text_fixes_punctuation() {
        let raw = "هَذَا نَصّ مُخْتَبَر!   Testing 123... هل هذا يعمل ؟؟ نعم   ";
        assert_eq!(clean_text(raw), "هذا نص مختبر! Testing 123. هل هذا يعمل؟ نعم");
    }

    #[test]
    fn clean_text_handles_spaced_repeated_punctuation() {
        assert_eq!(clean_text("done . . ."), "done.");
    }

    #[test]
    fn clean_text_is_idempotent() {
        let samples = [
            "",
            "   ",
            "انعقد المؤتمر الدولي للمناخ بحضور ممثلين من 40 دولة .",
            "a \u{0640} b ... c !! d ?",
            "\u{0627}\u{0001}\u{0653} x",
            "Mixed  نص  with\ttabs\nand lines ؟ ؟",
            "\u{0627}\u{06E5}\u{0653}\u{064E}ى",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn clean_document_keeps_lines() {
        let doc = "  السطر الأول  \n\n\tsecond   line \n";
        assert_eq!(clean_document(doc), "السطر الاول\nsecond line");
        assert_eq!(clean_document(&clean_document(doc)), clean_document(doc));
    }

    #[test]
    fn splits_sentences_on_both_scripts() {
        let sentences = split_sentences("هل هذا يعمل؟ نعم. It works!\nDone");
        assert_eq!(sentences, vec!["هل هذا يعمل؟", "نعم.", "It works!", "Done"]);
    }

    #[test]
    fn chunks_respect_max_length() {
        let text = "One two. Three four. Five six. Seven eight.";
        let chunks = chunk_text(text, 20);
        assert_eq!(chunks, vec!["One two. Three four.", "Five six.", "Seven eight."]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 20));
    }

    #[test]
    fn oversized_sentence_is_its_own_chunk() {
        let chunks = chunk_text("short. this sentence is far too long.", 10);
        assert_eq!(chunks, vec!["short.", "this sentence is far too long."]);
    }

    #[test]
    fn topic_preparation_strips_urls_and_emails() {
        let prepared =
            prepare_for_topic_detection("See https://example.org/x and mail me@example.org now");
        assert_eq!(prepared, "See and mail now");
    }
}
