/*!
 * External tool front-ends for stream probing and track extraction.
 *
 * `probe_subtitle_streams` asks ffprobe for the subtitle streams of one
 * container file and parses its JSON report. `extract_track` drives
 * mkvextract for one selected track, landing it in the staging area under
 * the video's stem with the codec's native extension. Batch loops live in
 * the controller, which owns ordering and progress reporting.
 */

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::info;

use crate::app_config::Config;
use crate::errors::ToolError;
use crate::process_utils::run_tool;
use crate::staging::StagingArea;
use crate::stream_selector::{FileStreams, ProbeOutput, StreamSelection, SubtitleStream};

/// Native file extension for a probed subtitle codec
pub fn extension_for_codec(codec: &str) -> &str {
    match codec {
        "subrip" => "srt",
        "ass" => "ass",
        "ssa" => "ssa",
        other => other,
    }
}

/// Probe one video file for its subtitle streams.
///
/// Runs ffprobe in quiet JSON mode restricted to subtitle streams. Empty
/// or unparseable output is reported as `ToolError::MalformedOutput`.
pub async fn probe_subtitle_streams(
    config: &Config,
    file: &Path,
) -> Result<FileStreams, ToolError> {
    let args: [&OsStr; 8] = [
        OsStr::new("-v"),
        OsStr::new("quiet"),
        OsStr::new("-print_format"),
        OsStr::new("json"),
        OsStr::new("-show_streams"),
        OsStr::new("-select_streams"),
        OsStr::new("s"),
        file.as_os_str(),
    ];
    let stdout = run_tool(&config.tools.ffprobe, args).await?;

    if stdout.trim().is_empty() {
        return Err(ToolError::MalformedOutput {
            tool: config.tools.ffprobe.path.clone(),
            message: format!("empty probe report for {}", file.display()),
        });
    }

    let probe: ProbeOutput =
        serde_json::from_str(&stdout).map_err(|e| ToolError::MalformedOutput {
            tool: config.tools.ffprobe.path.clone(),
            message: format!("invalid probe report for {}: {}", file.display(), e),
        })?;

    let streams = probe
        .streams
        .iter()
        .map(SubtitleStream::from_raw)
        .collect();
    Ok(FileStreams {
        file: file.to_path_buf(),
        streams,
    })
}

/// Extract one selected track from one video into the staging area.
///
/// The output file is named `<video stem>.<native extension>`.
pub async fn extract_track(
    config: &Config,
    video: &Path,
    selection: &StreamSelection,
    staging: &StagingArea,
) -> Result<PathBuf, ToolError> {
    let stem = video
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "subtitle".to_string());
    let extension = extension_for_codec(&selection.codec);
    let destination = staging.file(&format!("{}.{}", stem, extension));

    info!(
        "Extracting subtitles from {} to\n\t{}",
        file_name_of(video),
        file_name_of(&destination)
    );

    let track_spec = format!("{}:{}", selection.index, destination.display());
    let args: [&OsStr; 3] = [
        OsStr::new("tracks"),
        video.as_os_str(),
        OsStr::new(&track_spec),
    ];
    run_tool(&config.tools.mkvextract, args).await?;

    Ok(destination)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
