use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::Instant;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::cleaning_rules;
use crate::decision::{DecisionSource, TerminalDecisions};
use crate::extraction;
use crate::file_utils::FileManager;
use crate::staging::StagingArea;
use crate::stream_selector::{self, StreamSelection};
use crate::style_filter;
use crate::subtitle_document::SubtitleDocument;
use crate::sync;

// @module: Application controller for the subtitle pipeline

/// Main application controller driving the batch pipeline
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the whole pipeline against a working directory, prompting the
    /// operator on the terminal for every decision
    pub async fn run(&self, working_dir: PathBuf, keep_artifacts: bool) -> Result<Vec<PathBuf>> {
        let mut decisions = TerminalDecisions::new();
        self.run_with_decisions(&working_dir, keep_artifacts, &mut decisions)
            .await
    }

    /// Run the whole pipeline with an injected decision source.
    ///
    /// Stages in order: discover pairs, probe streams, resolve selections,
    /// extract references, style-filter references, clean targets, sync
    /// each pair back into the working directory. Every intermediate file
    /// lives in a scoped staging area that is removed when the run ends,
    /// successfully or not, unless `keep_artifacts` is set.
    pub async fn run_with_decisions(
        &self,
        working_dir: &Path,
        keep_artifacts: bool,
        decisions: &mut dyn DecisionSource,
    ) -> Result<Vec<PathBuf>> {
        let start_time = Instant::now();

        if !working_dir.exists() {
            return Err(anyhow::anyhow!(
                "Working directory does not exist: {:?}",
                working_dir
            ));
        }

        let batch = FileManager::discover_batch(working_dir)?;
        info!(
            "Found {} video/subtitle pairs in {}",
            batch.videos.len(),
            working_dir.display()
        );

        // Probe every video, then resolve which track to pull from each
        let mut catalog = Vec::with_capacity(batch.videos.len());
        for video in &batch.videos {
            catalog.push(extraction::probe_subtitle_streams(&self.config, video).await?);
        }
        let selections = stream_selector::select_streams(&catalog, decisions)?;

        let multi_progress = MultiProgress::new();

        let mut extraction_staging = StagingArea::stage("subtitle_extraction")?;
        if keep_artifacts {
            extraction_staging.retain();
        }
        let extracted = self
            .extract_with_progress(&batch.videos, &selections, &extraction_staging, &multi_progress)
            .await?;

        let mut reference_staging = StagingArea::stage("cleaned_subtitles_")?;
        if keep_artifacts {
            reference_staging.retain();
        }
        let references =
            self.filter_reference_styles(&extracted, &reference_staging, decisions)?;

        let mut target_staging = StagingArea::stage("cleaned_subs_")?;
        if keep_artifacts {
            target_staging.retain();
        }
        let targets = self.clean_japanese_subtitles(&batch.subtitles, &target_staging, decisions)?;

        let outputs = self
            .sync_with_progress(&references, &targets, working_dir, &multi_progress)
            .await?;

        // Error paths are covered by each staging area's drop handler
        extraction_staging.cleanup()?;
        reference_staging.cleanup()?;
        target_staging.cleanup()?;

        info!(
            "Processing completed in {}.",
            Self::format_duration(start_time.elapsed())
        );
        Ok(outputs)
    }

    /// Extract the selected track of every video into the staging area
    async fn extract_with_progress(
        &self,
        videos: &[PathBuf],
        selections: &[StreamSelection],
        staging: &StagingArea,
        multi_progress: &MultiProgress,
    ) -> Result<Vec<PathBuf>> {
        let progress_bar = multi_progress.add(ProgressBar::new(videos.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tracks ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Extracting");

        let mut extracted = Vec::with_capacity(videos.len());
        for (video, selection) in videos.iter().zip(selections) {
            let track = extraction::extract_track(&self.config, video, selection, staging).await?;
            extracted.push(track);
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Extraction complete");
        Ok(extracted)
    }

    /// Load the extracted references, resolve the style keep-set once for
    /// the whole batch, and save the filtered documents as ASS files
    fn filter_reference_styles(
        &self,
        extracted: &[PathBuf],
        staging: &StagingArea,
        decisions: &mut dyn DecisionSource,
    ) -> Result<Vec<PathBuf>> {
        let mut documents = Vec::with_capacity(extracted.len());
        for path in extracted {
            documents.push(SubtitleDocument::load(path)?);
        }

        let usages = style_filter::analyze_styles(&documents);
        let keep = style_filter::choose_styles_to_keep(&usages, decisions)?;
        debug!("Keeping styles: {:?}", keep);

        let mut cleaned_paths = Vec::with_capacity(documents.len());
        for (document, source) in documents.iter_mut().zip(extracted) {
            style_filter::apply_style_filter(document, &keep);

            let stem = source.file_stem().unwrap_or_default().to_string_lossy();
            let cleaned_path = staging.file(&format!("{}.ass", stem));
            document.save(&cleaned_path)?;
            info!("Saved cleaned subtitle to {}", cleaned_path.display());
            cleaned_paths.push(cleaned_path);
        }
        Ok(cleaned_paths)
    }

    /// Load the target subtitles, resolve the four cleaning decisions once
    /// for the whole batch, and save the cleaned documents under their
    /// original file names
    fn clean_japanese_subtitles(
        &self,
        targets: &[PathBuf],
        staging: &StagingArea,
        decisions: &mut dyn DecisionSource,
    ) -> Result<Vec<PathBuf>> {
        let mut documents = Vec::with_capacity(targets.len());
        for path in targets {
            documents.push(SubtitleDocument::load(path)?);
        }

        let resolved = cleaning_rules::clean_batch(&mut documents, decisions)?;
        debug!("Cleaning decisions: {:?}", resolved);

        let mut cleaned_paths = Vec::with_capacity(documents.len());
        for (document, source) in documents.iter().zip(targets) {
            let file_name = source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "subtitle.srt".to_string());
            let cleaned_path = staging.file(&file_name);
            document.save(&cleaned_path)?;
            info!("Saving cleaned Japanese subtitle to {}", cleaned_path.display());
            cleaned_paths.push(cleaned_path);
        }

        info!("Finished cleaning Japanese subtitles.");
        Ok(cleaned_paths)
    }

    /// Sync every (reference, target) pair into the output directory
    async fn sync_with_progress(
        &self,
        references: &[PathBuf],
        targets: &[PathBuf],
        output_dir: &Path,
        multi_progress: &MultiProgress,
    ) -> Result<Vec<PathBuf>> {
        FileManager::ensure_dir(output_dir)?;

        let progress_bar = multi_progress.add(ProgressBar::new(references.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pairs ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Syncing");

        let mut outputs = Vec::with_capacity(references.len());
        for (reference, target) in references.iter().zip(targets) {
            let output = FileManager::sync_output_path(reference, target, output_dir);
            sync::sync_subtitle(&self.config, reference, target, &output).await?;
            outputs.push(output);
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Sync complete");
        info!("Finished syncing subtitles.");
        Ok(outputs)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
