use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::errors::ConfigError;

// @module: File discovery and IO utilities

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// The video/subtitle file pairs of one pipeline run, positionally aligned
/// after natural-order sorting.
#[derive(Debug, Clone)]
pub struct BatchFiles {
    /// Video container files, episode order
    pub videos: Vec<PathBuf>,
    /// Target subtitle files, episode order, same length as `videos`
    pub subtitles: Vec<PathBuf>,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Sort key for episode ordering: whitespace stripped, lowercased, every
    /// digit run zero-padded to 5 digits, so "Ep 2" sorts before "Ep 10".
    pub fn episode_sort_key(file_name: &str) -> String {
        let squashed = WHITESPACE_RE.replace_all(file_name, "");
        DIGIT_RUN_RE
            .replace_all(&squashed.to_lowercase(), |caps: &regex::Captures| {
                format!("{:0>5}", &caps[0])
            })
            .into_owned()
    }

    /// Find files with a specific extension directly inside a directory,
    /// sorted in episode order
    pub fn find_by_extension<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let normalized_ext = extension.trim_start_matches('.');

        let mut result = Vec::new();
        for entry in WalkDir::new(dir.as_ref()).max_depth(1).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort_by_key(|path| Self::episode_sort_key(&path.file_name().unwrap_or_default().to_string_lossy()));
        Ok(result)
    }

    /// Discover the run's video/subtitle pairs in a working directory.
    ///
    /// Videos are all `.mkv` files. Targets start as the `.srt` files; if the
    /// counts differ, the target set widens to `.srt` plus `.ass` before the
    /// final comparison. A remaining mismatch aborts the run.
    pub fn discover_batch<P: AsRef<Path>>(dir: P) -> Result<BatchFiles> {
        let dir = dir.as_ref();

        let videos = Self::find_by_extension(dir, "mkv")?;
        if videos.is_empty() {
            return Err(ConfigError::EmptyBatch.into());
        }

        let mut subtitles = Self::find_by_extension(dir, "srt")?;
        if videos.len() != subtitles.len() {
            let mut widened = Self::find_by_extension(dir, "srt")?;
            widened.extend(Self::find_by_extension(dir, "ass")?);
            widened.sort_by_key(|path| {
                Self::episode_sort_key(&path.file_name().unwrap_or_default().to_string_lossy())
            });
            subtitles = widened;
        }

        if videos.len() != subtitles.len() {
            return Err(ConfigError::FileCountMismatch {
                videos: videos.len(),
                subtitles: subtitles.len(),
            }
            .into());
        }

        Ok(BatchFiles { videos, subtitles })
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Output path for a synced subtitle
    // @params: reference path (names the output), target path (lends its extension)
    pub fn sync_output_path<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        reference: P1,
        target: P2,
        output_dir: P3,
    ) -> PathBuf {
        let reference = reference.as_ref();
        let target = target.as_ref();

        let mut output_filename = reference
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if let Some(ext) = target.extension() {
            output_filename.push('.');
            output_filename.push_str(&ext.to_string_lossy());
        }

        output_dir.as_ref().join(output_filename)
    }
}
