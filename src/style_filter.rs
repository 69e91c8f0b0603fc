/*!
 * Style-frequency filter for extracted reference subtitles.
 *
 * Styles carrying a known sign/karaoke family marker are dropped without
 * asking. Everything else is ranked by how often it occurs across the
 * batch, shown with a few example lines, and the operator picks the set
 * to keep by index. An empty answer keeps every ranked style.
 */

use anyhow::Result;

use crate::decision::DecisionSource;
use crate::errors::ConfigError;
use crate::subtitle_document::SubtitleDocument;

/// Style name fragments that mark non-dialogue typesetting tracks
pub const IGNORED_STYLE_FAMILIES: [&str; 8] = [
    "Signs", "Caption", "Song", "ED", "OP", "Opening", "Ending", "Karaoke",
];

/// Example lines collected per ranked style
const MAX_EXAMPLES_PER_STYLE: usize = 5;

/// One ranked style with its usage count and example lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleUsage {
    pub name: String,
    pub count: usize,
    pub examples: Vec<String>,
}

/// True when the style name contains any auto-ignored family marker
pub fn is_ignored_style(style: &str) -> bool {
    IGNORED_STYLE_FAMILIES
        .iter()
        .any(|family| style.contains(family))
}

/// Count style usage across the whole batch. Ignored families are skipped,
/// examples are capped per style, and the result is sorted by descending
/// count with first-seen order breaking ties.
pub fn analyze_styles(documents: &[SubtitleDocument]) -> Vec<StyleUsage> {
    let mut usages: Vec<StyleUsage> = Vec::new();

    for document in documents {
        for line in &document.lines {
            if is_ignored_style(&line.style) {
                continue;
            }

            match usages.iter_mut().find(|usage| usage.name == line.style) {
                Some(usage) => {
                    usage.count += 1;
                    if usage.examples.len() < MAX_EXAMPLES_PER_STYLE {
                        usage.examples.push(line.text.clone());
                    }
                }
                None => usages.push(StyleUsage {
                    name: line.style.clone(),
                    count: 1,
                    examples: vec![line.text.clone()],
                }),
            }
        }
    }

    usages.sort_by(|a, b| b.count.cmp(&a.count));
    usages
}

/// Render one ranked entry with its example lines indented beneath it
fn render_usage(position: usize, usage: &StyleUsage) -> String {
    let mut rendered = format!("[{}] {} times; {}", position, usage.count, usage.name);
    for example in &usage.examples {
        rendered.push_str(&format!("\n\t\t\t{}", example));
    }
    rendered
}

/// Present the ranked styles and resolve the keep-set. An empty answer
/// keeps all ranked styles; an index past the listing is an error.
pub fn choose_styles_to_keep(
    usages: &[StyleUsage],
    decisions: &mut dyn DecisionSource,
) -> Result<Vec<String>> {
    println!("Found the following styles:");

    let rendered: Vec<String> = usages
        .iter()
        .enumerate()
        .map(|(position, usage)| render_usage(position, usage))
        .collect();
    let chosen = decisions.choose_many(&rendered)?;

    if chosen.is_empty() {
        return Ok(usages.iter().map(|usage| usage.name.clone()).collect());
    }

    let mut keep = Vec::with_capacity(chosen.len());
    for index in chosen {
        if index >= usages.len() {
            return Err(ConfigError::SelectionOutOfRange {
                index,
                count: usages.len(),
            }
            .into());
        }
        keep.push(usages[index].name.clone());
    }
    Ok(keep)
}

/// Drop every line whose style is outside the keep set, then drop the
/// structural leftovers that no longer render anything.
pub fn apply_style_filter(document: &mut SubtitleDocument, keep: &[String]) {
    document
        .lines
        .retain(|line| keep.iter().any(|name| name == &line.style));
    document.remove_miscellaneous_lines();
}
