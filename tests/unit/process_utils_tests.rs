/*!
 * Tests for deadline-bounded external process execution
 */

use anyhow::Result;
use jimaku_sync::app_config::ToolConfig;
use jimaku_sync::errors::ToolError;
use jimaku_sync::process_utils::run_tool;
use crate::common;

fn tool_at(path: &std::path::Path, timeout_secs: u64) -> ToolConfig {
    ToolConfig {
        path: path.to_string_lossy().into_owned(),
        timeout_secs,
    }
}

/// Test that a successful tool run returns its captured stdout
#[cfg(unix)]
#[tokio::test]
async fn test_runTool_withSucceedingTool_shouldReturnStdout() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool_path = common::create_fake_tool(temp_dir.path(), "probe", r#"echo "hello $1""#)?;
    let tool = tool_at(&tool_path, 10);

    let stdout = run_tool(&tool, ["world"]).await?;

    assert_eq!(stdout.trim(), "hello world");
    Ok(())
}

/// Test that a nonzero exit surfaces the code and the stderr tail
#[cfg(unix)]
#[tokio::test]
async fn test_runTool_withFailingTool_shouldReportExitCodeAndStderr() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool_path = common::create_fake_tool(
        temp_dir.path(),
        "extract",
        "echo 'track missing' >&2\nexit 2",
    )?;
    let tool = tool_at(&tool_path, 10);

    let error = run_tool(&tool, ["tracks"]).await.unwrap_err();

    match error {
        ToolError::NonZeroExit { code, stderr, .. } => {
            assert_eq!(code, 2);
            assert!(stderr.contains("track missing"));
        }
        other => panic!("Expected NonZeroExit, got {:?}", other),
    }
    Ok(())
}

/// Test that a missing binary fails at launch, not at exit
#[tokio::test]
async fn test_runTool_withMissingBinary_shouldFailToLaunch() {
    let tool = ToolConfig {
        path: "/nonexistent/jimaku-sync-no-such-tool".to_string(),
        timeout_secs: 10,
    };

    let error = run_tool(&tool, ["arg"]).await.unwrap_err();

    assert!(matches!(error, ToolError::LaunchFailed { .. }));
}

/// Test that a tool exceeding its deadline is reported as timed out
#[cfg(unix)]
#[tokio::test]
async fn test_runTool_withSlowTool_shouldTimeOut() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let tool_path = common::create_fake_tool(temp_dir.path(), "slow", "sleep 5")?;
    let tool = tool_at(&tool_path, 1);

    let error = run_tool(&tool, Vec::<String>::new()).await.unwrap_err();

    match error {
        ToolError::TimedOut { seconds, .. } => assert_eq!(seconds, 1),
        other => panic!("Expected TimedOut, got {:?}", other),
    }
    Ok(())
}
