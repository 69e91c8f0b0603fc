/*!
 * Timing alignment of target subtitles against extracted references.
 *
 * Each (reference, target) pair is handed to alass; the tool's own
 * "shifted block" report lines are the interesting part of its output and
 * are surfaced to the operator. The controller owns the pairing loop and
 * names outputs after the reference stem with the target's extension.
 */

use std::ffi::OsStr;
use std::path::Path;

use log::info;

use crate::app_config::Config;
use crate::errors::ToolError;
use crate::process_utils::run_tool;

/// Align one target subtitle to one reference subtitle.
///
/// Surfaces the aligner's per-block shift report and returns it.
pub async fn sync_subtitle(
    config: &Config,
    reference: &Path,
    target: &Path,
    output: &Path,
) -> Result<String, ToolError> {
    info!(
        "Syncing subtitle files:\nReference: {}\nTarget: {}",
        reference.display(),
        target.display()
    );
    info!("Output: {}", output.display());

    let args: [&OsStr; 3] = [reference.as_os_str(), target.as_os_str(), output.as_os_str()];
    let stdout = run_tool(&config.tools.alass, args).await?;

    let shift_report: String = stdout
        .lines()
        .filter(|line| line.contains("shifted block"))
        .collect::<Vec<_>>()
        .join("\n");
    if !shift_report.is_empty() {
        info!("{}", shift_report);
    }

    Ok(shift_report)
}
