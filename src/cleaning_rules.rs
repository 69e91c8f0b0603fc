/*!
 * Batch text-cleaning rule engine.
 *
 * Four fixed noise categories are sampled across the whole batch, the
 * operator answers one keep/remove question per category, and the approved
 * removals are applied line-by-line to every document identically. Line
 * continuations are normalized before any pattern sees the text, and a
 * final hygiene pass drops emptied lines and provider watermarks.
 */

use std::collections::HashMap;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::decision::DecisionSource;
use crate::subtitle_document::SubtitleDocument;

/// Matches shown per category when asking for a decision
const MAX_SAMPLES_SHOWN: usize = 10;

/// Provider watermark; lines carrying it are dropped unconditionally
const WATERMARK: &str = "NETFLIX";

static HEARING_IMPAIRED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"（.+?）").unwrap());
static SPECIAL_SYMBOLS_RE: Lazy<Regex> = Lazy::new(|| Regex::new("♪|～|―|~").unwrap());
static FURIGANA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\([ぁ-ゞ]+?\)").unwrap());
static INITIAL_BRACKETS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(.+\)").unwrap());
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The closed set of noise categories, in application order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CleaningCategory {
    /// Full-width parenthesized spans, e.g. （笑い声）
    HearingImpaired,
    /// Decorative symbols ♪ ～ ― ~
    SpecialSymbols,
    /// ASCII-parenthesized hiragana-only reading glosses
    Furigana,
    /// A parenthesized span anchored at the start of the line
    InitialBrackets,
}

impl CleaningCategory {
    /// Fixed application order; also the order decisions are requested in
    pub const ALL: [CleaningCategory; 4] = [
        CleaningCategory::HearingImpaired,
        CleaningCategory::SpecialSymbols,
        CleaningCategory::Furigana,
        CleaningCategory::InitialBrackets,
    ];

    /// Category label used in operator prompts
    pub fn label(&self) -> &'static str {
        match self {
            CleaningCategory::HearingImpaired => "hearing impaired",
            CleaningCategory::SpecialSymbols => "special symbols",
            CleaningCategory::Furigana => "furigana",
            CleaningCategory::InitialBrackets => "initial brackets",
        }
    }

    /// The compiled pattern bound to this category
    pub fn pattern(&self) -> &'static Regex {
        match self {
            CleaningCategory::HearingImpaired => &HEARING_IMPAIRED_RE,
            CleaningCategory::SpecialSymbols => &SPECIAL_SYMBOLS_RE,
            CleaningCategory::Furigana => &FURIGANA_RE,
            CleaningCategory::InitialBrackets => &INITIAL_BRACKETS_RE,
        }
    }
}

/// One batch-wide remove/keep answer per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleaningDecisions {
    pub hearing_impaired: bool,
    pub special_symbols: bool,
    pub furigana: bool,
    pub initial_brackets: bool,
}

impl CleaningDecisions {
    /// Remove everything; handy for tests and non-interactive defaults
    pub fn remove_all() -> Self {
        CleaningDecisions {
            hearing_impaired: true,
            special_symbols: true,
            furigana: true,
            initial_brackets: true,
        }
    }

    fn is_remove(&self, category: CleaningCategory) -> bool {
        match category {
            CleaningCategory::HearingImpaired => self.hearing_impaired,
            CleaningCategory::SpecialSymbols => self.special_symbols,
            CleaningCategory::Furigana => self.furigana,
            CleaningCategory::InitialBrackets => self.initial_brackets,
        }
    }

    fn set(&mut self, category: CleaningCategory, remove: bool) {
        match category {
            CleaningCategory::HearingImpaired => self.hearing_impaired = remove,
            CleaningCategory::SpecialSymbols => self.special_symbols = remove,
            CleaningCategory::Furigana => self.furigana = remove,
            CleaningCategory::InitialBrackets => self.initial_brackets = remove,
        }
    }
}

/// Normalized line texts that matched each category, batch-wide
#[derive(Debug, Default)]
pub struct BatchScan {
    matches: HashMap<CleaningCategory, Vec<String>>,
}

impl BatchScan {
    pub fn matches_for(&self, category: CleaningCategory) -> &[String] {
        self.matches
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Convert continuation escapes before any pattern matching: hard breaks
/// `\N` become real newlines, soft breaks `\n` become single spaces.
pub fn normalize_breaks(text: &str) -> String {
    text.replace(r"\N", "\n").replace(r"\n", " ")
}

/// Read-only scan of every document for category matches
pub fn scan_documents(documents: &[SubtitleDocument]) -> BatchScan {
    let mut scan = BatchScan::default();

    for document in documents {
        for line in &document.lines {
            let normalized = normalize_breaks(&line.text);
            for category in CleaningCategory::ALL {
                if category.pattern().is_match(&normalized) {
                    scan.matches
                        .entry(category)
                        .or_default()
                        .push(normalized.clone());
                }
            }
        }
    }

    scan
}

/// Render one sampled line with each pattern occurrence listed beneath it
pub fn render_sample(text: &str, category: CleaningCategory) -> String {
    let highlights: Vec<String> = category
        .pattern()
        .find_iter(text)
        .map(|m| format!("-->\t{}", m.as_str()))
        .collect();

    if highlights.is_empty() {
        return text.to_string();
    }
    format!("{}\n\t{}", text, highlights.join("\n\t"))
}

/// Ask one remove/keep question per category that matched anywhere in the
/// batch. Categories with zero matches are never asked and default to keep.
pub fn gather_decisions(
    scan: &BatchScan,
    decisions: &mut dyn DecisionSource,
) -> Result<CleaningDecisions> {
    let mut result = CleaningDecisions::default();

    for category in CleaningCategory::ALL {
        let matched = scan.matches_for(category);
        if matched.is_empty() {
            continue;
        }

        let samples: Vec<String> = matched
            .iter()
            .take(MAX_SAMPLES_SHOWN)
            .map(|text| render_sample(text, category))
            .collect();

        let remove = decisions.confirm(&samples, category.label())?;
        result.set(category, remove);
    }

    Ok(result)
}

/// Clean one line of text: normalize breaks, strip approved categories in
/// fixed order, collapse whitespace runs to single spaces.
pub fn clean_line_text(text: &str, decisions: &CleaningDecisions) -> String {
    let mut text = normalize_breaks(text);

    for category in CleaningCategory::ALL {
        if decisions.is_remove(category) {
            text = category.pattern().replace_all(&text, "").into_owned();
        }
    }

    WHITESPACE_RE.replace_all(&text, " ").into_owned()
}

/// Apply the batch decisions to one document, then run the hygiene pass:
/// emptied lines and watermark carriers go, regardless of any decision.
pub fn apply_decisions(document: &mut SubtitleDocument, decisions: &CleaningDecisions) {
    for line in &mut document.lines {
        line.text = clean_line_text(&line.text, decisions);
    }

    document
        .lines
        .retain(|line| !line.text.is_empty() && !line.text.contains(WATERMARK));
    document.remove_miscellaneous_lines();
}

/// Full engine pass over a loaded batch: scan, one decision per category,
/// identical application everywhere. Returns the decisions used.
pub fn clean_batch(
    documents: &mut [SubtitleDocument],
    decisions: &mut dyn DecisionSource,
) -> Result<CleaningDecisions> {
    let scan = scan_documents(documents);
    let resolved = gather_decisions(&scan, decisions)?;

    for document in documents.iter_mut() {
        apply_decisions(document, &resolved);
    }

    Ok(resolved)
}
