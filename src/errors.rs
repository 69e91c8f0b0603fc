/*!
 * Error types for the jimaku-sync application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors caused by the operator's setup or answers; re-running after
/// fixing the condition is the only recovery.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The working directory holds no video files to process
    #[error("No video files found in the working directory")]
    EmptyBatch,

    /// Video and subtitle counts could not be reconciled
    #[error("Number of video files ({videos}) and subtitle files ({subtitles}) do not match")]
    FileCountMismatch {
        /// How many video files were discovered
        videos: usize,
        /// How many subtitle files were discovered after the extension fallback
        subtitles: usize,
    },

    /// A probed file exposes no subtitle streams at all
    #[error("No subtitle streams found in {file}")]
    NoSubtitleStreams {
        /// Display name of the offending video file
        file: String,
    },

    /// A selection index fell outside the presented catalog
    #[error("Selection index {index} is out of range, valid indices are 0..{count}")]
    SelectionOutOfRange {
        /// The index the operator chose
        index: usize,
        /// Number of presented options
        count: usize,
    },

    /// A selection answer could not be parsed as an index list
    #[error("Could not parse selection '{0}' as an index")]
    InvalidSelection(String),

    /// A configuration file value failed validation
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// Errors raised by the external tools the pipeline drives
#[derive(Error, Debug)]
pub enum ToolError {
    /// The tool binary could not be started at all
    #[error("Failed to launch {tool}: {message}")]
    LaunchFailed {
        /// Tool binary name
        tool: String,
        /// OS-level failure description
        message: String,
    },

    /// The tool ran but reported failure
    #[error("{tool} exited with status {code}: {stderr}")]
    NonZeroExit {
        /// Tool binary name
        tool: String,
        /// Exit code, or -1 when terminated by a signal
        code: i32,
        /// Trailing stderr output for diagnosis
        stderr: String,
    },

    /// The tool exceeded its deadline and was killed
    #[error("{tool} timed out after {seconds}s")]
    TimedOut {
        /// Tool binary name
        tool: String,
        /// The deadline that was exceeded
        seconds: u64,
    },

    /// The tool produced output the pipeline could not interpret
    #[error("Could not parse {tool} output: {message}")]
    MalformedOutput {
        /// Tool binary name
        tool: String,
        /// What was wrong with the output
        message: String,
    },
}

/// Errors from loading or saving subtitle documents
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file extension maps to no supported subtitle format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The file content does not follow its format's structure
    #[error("Failed to parse {file}: {message}")]
    ParseFailed {
        /// Display name of the offending subtitle file
        file: String,
        /// What was wrong with the content
        message: String,
    },

    /// The document could not be read from or written to disk
    #[error("Subtitle IO error for {file}: {message}")]
    Io {
        /// Display name of the file
        file: String,
        /// Underlying IO failure description
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the operator's setup or answers
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from an external tool invocation
    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    /// Error from subtitle document handling
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
