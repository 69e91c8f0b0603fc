use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use log::{debug, info};
use serde::Deserialize;

use crate::decision::DecisionSource;
use crate::errors::ConfigError;

// @module: Subtitle stream catalog and batch selection

/// Top-level ffprobe JSON payload
#[derive(Debug, Deserialize)]
pub struct ProbeOutput {
    #[serde(default)]
    pub streams: Vec<RawStream>,
}

/// One stream entry as ffprobe reports it
#[derive(Debug, Clone, Deserialize)]
pub struct RawStream {
    pub index: usize,
    #[serde(default)]
    pub codec_name: String,
    #[serde(default)]
    pub tags: RawStreamTags,
}

/// Optional per-stream tags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStreamTags {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Deduplicated descriptor of one subtitle track candidate.
///
/// Equality and hashing are structural over all three fields; two
/// descriptors with identical (index, name, codec) are the same candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubtitleStream {
    /// Container track id
    pub index: usize,
    /// Title tag, else language tag, else "unknown"
    pub name: String,
    /// Codec name as probed
    pub codec: String,
}

impl SubtitleStream {
    pub fn from_raw(raw: &RawStream) -> Self {
        let tags = &raw.tags;
        let name = tags
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or_else(|| tags.language.as_deref().map(str::trim).filter(|t| !t.is_empty()))
            .unwrap_or("unknown")
            .to_string();

        SubtitleStream {
            index: raw.index,
            name,
            codec: raw.codec_name.clone(),
        }
    }

    /// Catalog presentation line, `position` being the selectable index
    pub fn catalog_line(&self, position: usize) -> String {
        format!(
            "[{}] Stream {}: {} ({})",
            position, self.index, self.name, self.codec
        )
    }
}

/// Candidate streams probed from one video file
#[derive(Debug, Clone)]
pub struct FileStreams {
    /// The probed video file
    pub file: PathBuf,
    /// Its subtitle stream candidates, probe order
    pub streams: Vec<SubtitleStream>,
}

/// The (track index, codec) pair to extract from one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSelection {
    pub index: usize,
    pub codec: String,
}

impl From<&SubtitleStream> for StreamSelection {
    fn from(stream: &SubtitleStream) -> Self {
        StreamSelection {
            index: stream.index,
            codec: stream.codec.clone(),
        }
    }
}

/// Resolve which stream to extract from each file of the batch.
///
/// Three shapes, in priority order: every file exposing exactly one
/// candidate selects it directly; every file exposing the same count
/// answers one broadcast choice over the first file's deduplicated
/// candidates; differing counts ask one choice per file. The result is
/// positionally aligned with `catalog`.
pub fn select_streams(
    catalog: &[FileStreams],
    decisions: &mut dyn DecisionSource,
) -> Result<Vec<StreamSelection>> {
    if catalog.is_empty() {
        return Err(ConfigError::EmptyBatch.into());
    }
    for entry in catalog {
        if entry.streams.is_empty() {
            return Err(ConfigError::NoSubtitleStreams {
                file: entry.file.display().to_string(),
            }
            .into());
        }
    }

    // Uniform-trivial: one candidate everywhere, nothing to ask
    if catalog.iter().all(|entry| entry.streams.len() == 1) {
        debug!("Every file exposes a single subtitle stream, selecting it directly");
        return Ok(catalog
            .iter()
            .map(|entry| StreamSelection::from(&entry.streams[0]))
            .collect());
    }

    // Uniform-multi: same candidate count everywhere, one broadcast choice
    let first_count = catalog[0].streams.len();
    if catalog.iter().all(|entry| entry.streams.len() == first_count) {
        let unique = unique_streams(&catalog[0].streams);
        let selected = resolve_choice(&unique, decisions)?;
        return Ok(vec![StreamSelection::from(selected); catalog.len()]);
    }

    // Heterogeneous: candidate counts differ, one choice per file
    info!("Subtitle streams differ between files. Please select streams to extract for each file.");
    let mut selections = Vec::with_capacity(catalog.len());
    for entry in catalog {
        let unique = unique_streams(&entry.streams);
        let selected = resolve_choice(&unique, decisions)?;
        selections.push(StreamSelection::from(selected));
    }
    Ok(selections)
}

/// Deduplicate candidates structurally, keeping first-seen order
pub fn unique_streams(streams: &[SubtitleStream]) -> Vec<SubtitleStream> {
    let mut seen = HashSet::new();
    streams
        .iter()
        .filter(|stream| seen.insert((*stream).clone()))
        .cloned()
        .collect()
}

/// Present a deduplicated catalog and return the chosen stream. A single
/// distinct candidate short-circuits without interaction; an answer outside
/// the presented range is a configuration error naming the valid range.
fn resolve_choice<'a>(
    unique: &'a [SubtitleStream],
    decisions: &mut dyn DecisionSource,
) -> Result<&'a SubtitleStream> {
    if unique.len() == 1 {
        return Ok(&unique[0]);
    }

    let options: Vec<String> = unique
        .iter()
        .enumerate()
        .map(|(position, stream)| stream.catalog_line(position))
        .collect();

    let chosen = decisions.choose_one(&options)?;
    if chosen >= unique.len() {
        return Err(ConfigError::SelectionOutOfRange {
            index: chosen,
            count: unique.len(),
        }
        .into());
    }
    Ok(&unique[chosen])
}
