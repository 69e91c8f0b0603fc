/*!
 * Integration tests for the cleaning and style-filtering stages over real
 * subtitle files, driven by a scripted decision source
 */

use std::path::PathBuf;

use anyhow::Result;
use jimaku_sync::cleaning_rules;
use jimaku_sync::decision::ScriptedDecisions;
use jimaku_sync::staging::StagingArea;
use jimaku_sync::style_filter;
use jimaku_sync::subtitle_document::SubtitleDocument;
use crate::common;

/// Test the target-cleaning stage end to end: load a batch from disk,
/// answer one question per matched category, save the cleaned files into a
/// staging area and verify what survived
#[test]
fn test_cleaningWorkflow_withNoisyBatch_shouldCleanEveryFileAlike() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let episode_one = common::create_test_file(
        temp_dir.path(),
        "ep01.srt",
        "1\n00:00:01,000 --> 00:00:03,000\n（ドアの音）入るぞ\n\n2\n00:00:04,000 --> 00:00:06,000\nA NETFLIX ORIGINAL SERIES\n\n3\n00:00:07,000 --> 00:00:09,000\n♪ラララ\n",
    )?;
    let episode_two = common::create_test_file(
        temp_dir.path(),
        "ep02.srt",
        "1\n00:00:01,000 --> 00:00:03,000\n（よろしく）hello\n\n2\n00:00:04,000 --> 00:00:06,000\nそのまま\n",
    )?;

    let sources = [episode_one, episode_two];
    let mut documents = sources
        .iter()
        .map(SubtitleDocument::load)
        .collect::<Result<Vec<_>, _>>()?;

    // Remove hearing-impaired spans, keep the decorative symbols
    let mut decisions = ScriptedDecisions::new().with_confirm(true).with_confirm(false);
    let resolved = cleaning_rules::clean_batch(&mut documents, &mut decisions)?;
    assert!(resolved.hearing_impaired);
    assert!(!resolved.special_symbols);
    assert_eq!(decisions.confirm_labels, vec!["hearing impaired", "special symbols"]);

    let mut staging = StagingArea::stage("cleaned_subs_")?;
    let mut cleaned_paths = Vec::new();
    for (document, source) in documents.iter().zip(&sources) {
        let name = source.file_name().unwrap().to_string_lossy();
        let path = staging.file(&name);
        document.save(&path)?;
        cleaned_paths.push(path);
    }

    let first = SubtitleDocument::load(&cleaned_paths[0])?;
    let texts: Vec<&str> = first.lines.iter().map(|line| line.text.as_str()).collect();
    // The watermark line is gone, the kept symbol line is intact
    assert_eq!(texts, vec!["入るぞ", "♪ラララ"]);

    let second = SubtitleDocument::load(&cleaned_paths[1])?;
    let texts: Vec<&str> = second.lines.iter().map(|line| line.text.as_str()).collect();
    assert_eq!(texts, vec!["hello", "そのまま"]);

    staging.cleanup()?;
    assert!(!cleaned_paths[0].exists());
    Ok(())
}

/// Test the reference style-filtering stage end to end: load ASS files,
/// keep all ranked styles via an empty answer and verify the permanent
/// exclusion of ignore-family lines
#[test]
fn test_styleFilterWorkflow_withSignsTrack_shouldDropSignsAndKeepDialogue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let sources = [
        common::create_test_ass(
            temp_dir.path(),
            "ep01.ass",
            &[
                ("Default", "first line"),
                ("Signs - Main", "SHOP SIGN"),
                ("Default", "second line"),
            ],
        )?,
        common::create_test_ass(
            temp_dir.path(),
            "ep02.ass",
            &[("Default", "third line"), ("Flashback", "earlier that day")],
        )?,
    ];

    let mut documents = sources
        .iter()
        .map(SubtitleDocument::load)
        .collect::<Result<Vec<_>, _>>()?;

    let usages = style_filter::analyze_styles(&documents);
    assert!(usages.iter().all(|usage| usage.name != "Signs - Main"));

    // Empty answer: keep everything that was ranked
    let mut decisions = ScriptedDecisions::new().with_choices(vec![]);
    let keep = style_filter::choose_styles_to_keep(&usages, &mut decisions)?;
    assert_eq!(keep.len(), 2);

    let mut staging = StagingArea::stage("cleaned_subtitles_")?;
    let mut cleaned_paths = Vec::new();
    for (document, source) in documents.iter_mut().zip(&sources) {
        style_filter::apply_style_filter(document, &keep);
        let stem = source.file_stem().unwrap().to_string_lossy();
        let path = staging.file(&format!("{}.ass", stem));
        document.save(&path)?;
        cleaned_paths.push(path);
    }

    let first = SubtitleDocument::load(&cleaned_paths[0])?;
    assert_eq!(first.lines.len(), 2);
    assert!(first.lines.iter().all(|line| line.style == "Default"));

    let second = SubtitleDocument::load(&cleaned_paths[1])?;
    assert_eq!(second.lines.len(), 2);

    staging.cleanup()?;
    Ok(())
}

/// Test that a missing subtitle file surfaces as a document error
#[test]
fn test_subtitleWorkflow_withMissingFile_shouldFailToLoad() {
    let missing = PathBuf::from("non_existent_file.srt");
    assert!(SubtitleDocument::load(&missing).is_err());
}
