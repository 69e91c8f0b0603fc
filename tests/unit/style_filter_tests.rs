/*!
 * Tests for style usage ranking and filtering
 */

use anyhow::Result;
use jimaku_sync::decision::ScriptedDecisions;
use jimaku_sync::errors::ConfigError;
use jimaku_sync::style_filter::{
    analyze_styles, apply_style_filter, choose_styles_to_keep, is_ignored_style,
};
use jimaku_sync::subtitle_document::{SubtitleDocument, SubtitleLine};

fn document_from_styled(lines: &[(&str, &str)]) -> SubtitleDocument {
    let lines = lines
        .iter()
        .enumerate()
        .map(|(i, (style, text))| {
            SubtitleLine::new((i as u64) * 2_000, (i as u64) * 2_000 + 1_500, style, text)
        })
        .collect();
    SubtitleDocument::from_lines(lines)
}

/// Test the ignore-family substring matching
#[test]
fn test_isIgnoredStyle_withFamilySubstrings_shouldMatchAsSubstring() {
    assert!(is_ignored_style("Signs - Main"));
    assert!(is_ignored_style("OP Romaji"));
    assert!(is_ignored_style("Karaoke-Effect"));
    assert!(!is_ignored_style("Default"));
    assert!(!is_ignored_style("Main Dialogue"));
}

/// Test counting, example capping and frequency ranking
#[test]
fn test_analyzeStyles_withMixedStyles_shouldRankByFrequency() {
    let documents = vec![
        document_from_styled(&[
            ("Alt", "alt one"),
            ("Default", "one"),
            ("Default", "two"),
            ("Signs - Main", "STOP SIGN"),
        ]),
        document_from_styled(&[("Default", "three"), ("Alt", "alt two")]),
    ];

    let usages = analyze_styles(&documents);

    assert_eq!(usages.len(), 2);
    assert_eq!(usages[0].name, "Default");
    assert_eq!(usages[0].count, 3);
    assert_eq!(usages[1].name, "Alt");
    assert_eq!(usages[1].count, 2);
    // The ignore-family style never reaches the ranking at all
    assert!(usages.iter().all(|usage| usage.name != "Signs - Main"));
}

/// Test that stored examples are capped at five per style
#[test]
fn test_analyzeStyles_withManyLines_shouldCapExamplesAtFive() {
    let lines: Vec<(&str, String)> = (0..8).map(|i| ("Default", format!("line {}", i))).collect();
    let borrowed: Vec<(&str, &str)> = lines
        .iter()
        .map(|(style, text)| (*style, text.as_str()))
        .collect();
    let documents = vec![document_from_styled(&borrowed)];

    let usages = analyze_styles(&documents);

    assert_eq!(usages[0].count, 8);
    assert_eq!(usages[0].examples.len(), 5);
    assert_eq!(usages[0].examples[0], "line 0");
}

/// Test that ties keep first-seen order
#[test]
fn test_analyzeStyles_withTiedCounts_shouldKeepFirstSeenOrder() {
    let documents = vec![document_from_styled(&[
        ("Flashback", "a"),
        ("Default", "b"),
        ("Flashback", "c"),
        ("Default", "d"),
    ])];

    let usages = analyze_styles(&documents);

    assert_eq!(usages[0].name, "Flashback");
    assert_eq!(usages[1].name, "Default");
}

/// Test that an empty answer keeps every ranked style
#[test]
fn test_chooseStylesToKeep_withEmptyAnswer_shouldKeepAllRanked() -> Result<()> {
    let documents = vec![document_from_styled(&[
        ("Default", "one"),
        ("Default", "two"),
        ("Alt", "alt"),
        ("Signs - Main", "SIGN"),
    ])];
    let usages = analyze_styles(&documents);
    let mut decisions = ScriptedDecisions::new().with_choices(vec![]);

    let keep = choose_styles_to_keep(&usages, &mut decisions)?;

    assert_eq!(keep, vec!["Default".to_string(), "Alt".to_string()]);
    // The listing the operator saw follows the ranked presentation format
    assert_eq!(decisions.presented_rankings.len(), 1);
    assert!(decisions.presented_rankings[0][0].starts_with("[0] 2 times; Default"));
    assert!(decisions.presented_rankings[0][1].starts_with("[1] 1 times; Alt"));
    Ok(())
}

/// Test that an explicit answer selects exactly those ranked styles
#[test]
fn test_chooseStylesToKeep_withExplicitIndices_shouldSelectThose() -> Result<()> {
    let documents = vec![document_from_styled(&[
        ("Default", "one"),
        ("Default", "two"),
        ("Alt", "alt"),
    ])];
    let usages = analyze_styles(&documents);
    let mut decisions = ScriptedDecisions::new().with_choices(vec![1]);

    let keep = choose_styles_to_keep(&usages, &mut decisions)?;

    assert_eq!(keep, vec!["Alt".to_string()]);
    Ok(())
}

/// Test that an index past the ranking is a configuration error
#[test]
fn test_chooseStylesToKeep_withOutOfRangeIndex_shouldReportValidRange() {
    let documents = vec![document_from_styled(&[("Default", "one")])];
    let usages = analyze_styles(&documents);
    let mut decisions = ScriptedDecisions::new().with_choices(vec![4]);

    let error = choose_styles_to_keep(&usages, &mut decisions).unwrap_err();

    match error.downcast_ref::<ConfigError>() {
        Some(ConfigError::SelectionOutOfRange { index, count }) => {
            assert_eq!(*index, 4);
            assert_eq!(*count, 1);
        }
        other => panic!("Expected SelectionOutOfRange, got {:?}", other),
    }
}

/// Test that filtering keeps only the chosen styles, in playback order
#[test]
fn test_applyStyleFilter_withKeepSet_shouldDropEverythingElse() {
    let mut document = document_from_styled(&[
        ("Default", "one"),
        ("Alt", "alt"),
        ("Default", "two"),
    ]);

    apply_style_filter(&mut document, &["Default".to_string()]);

    assert_eq!(document.lines.len(), 2);
    assert_eq!(document.lines[0].text, "one");
    assert_eq!(document.lines[1].text, "two");
}

/// Test the permanent exclusion: an ignore-family line is dropped even when
/// the operator answered with an explicit keep-set covering every ranking
#[test]
fn test_applyStyleFilter_withIgnoredFamilyStyle_shouldAlwaysDropIt() -> Result<()> {
    let mut document = document_from_styled(&[
        ("Default", "dialogue"),
        ("Signs - Main", "SIGN TEXT"),
    ]);
    let usages = analyze_styles(std::slice::from_ref(&document));
    let mut decisions = ScriptedDecisions::new().with_choices(vec![0]);
    let keep = choose_styles_to_keep(&usages, &mut decisions)?;

    apply_style_filter(&mut document, &keep);

    assert_eq!(document.lines.len(), 1);
    assert_eq!(document.lines[0].text, "dialogue");
    Ok(())
}
