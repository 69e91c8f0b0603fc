/*!
 * External process execution.
 *
 * Every external tool the pipeline drives (ffprobe, mkvextract, alass) goes
 * through `run_tool`, which enforces the tool's configured deadline and maps
 * failures into the `ToolError` taxonomy.
 */

use std::ffi::OsStr;
use std::time::Duration;

use log::debug;
use tokio::process::Command;

use crate::app_config::ToolConfig;
use crate::errors::ToolError;

/// Longest stderr tail carried into an error message
const STDERR_TAIL_CHARS: usize = 500;

/// Run an external tool to completion, capturing stdout.
///
/// The invocation is bounded by the tool's `timeout_secs`; a child that
/// exceeds it is killed and reported as `ToolError::TimedOut`. A nonzero
/// exit becomes `ToolError::NonZeroExit` carrying the stderr tail.
pub async fn run_tool<I, S>(tool: &ToolConfig, args: I) -> Result<String, ToolError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<String> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string_lossy().into_owned())
        .collect();

    debug!("Running: {} {}", tool.path, args.join(" "));

    // kill_on_drop so the child cannot outlive its deadline
    let output_future = Command::new(&tool.path)
        .args(&args)
        .kill_on_drop(true)
        .output();

    let timeout_duration = Duration::from_secs(tool.timeout_secs);
    let output = tokio::select! {
        result = output_future => {
            result.map_err(|e| ToolError::LaunchFailed {
                tool: tool.path.clone(),
                message: e.to_string(),
            })?
        },
        _ = tokio::time::sleep(timeout_duration) => {
            return Err(ToolError::TimedOut {
                tool: tool.path.clone(),
                seconds: tool.timeout_secs,
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ToolError::NonZeroExit {
            tool: tool.path.clone(),
            code: output.status.code().unwrap_or(-1),
            stderr: stderr_tail(&stderr),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Keep the tail end of stderr, where tools put the actual failure reason
fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let char_count = trimmed.chars().count();
    if char_count <= STDERR_TAIL_CHARS {
        return trimmed.to_string();
    }
    let skip = char_count - STDERR_TAIL_CHARS;
    trimmed.chars().skip(skip).collect()
}
