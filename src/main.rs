// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod subtitle_document;
mod file_utils;
mod app_controller;
mod decision;
mod stream_selector;
mod extraction;
mod cleaning_rules;
mod style_filter;
mod sync;
mod staging;
mod process_utils;
mod errors;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, clean and sync subtitles in a working directory (default command)
    #[command(alias = "sync")]
    Sync(SyncArgs),

    /// Generate shell completions for jimaku-sync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct SyncArgs {
    /// Working directory holding the video releases and target subtitles
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    directory: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep staging directories after the run instead of removing them
    #[arg(short, long)]
    keep_artifacts: bool,
}

/// jimaku-sync - batch subtitle preparation for Japanese releases
///
/// Extracts reference subtitles from video files, cleans both the references
/// and the Japanese target subtitles, and aligns each pair with alass.
#[derive(Parser, Debug)]
#[command(name = "jimaku-sync")]
#[command(author = "jimaku-sync team")]
#[command(version = "0.1.0")]
#[command(about = "Batch subtitle extraction, cleaning and sync tool")]
#[command(long_about = "jimaku-sync prepares Japanese subtitles for a batch of video releases: it
extracts a reference subtitle track from every video, strips sign/karaoke
styles from the references, cleans noise out of the Japanese targets, and
aligns each pair, writing the synced files next to the videos.

EXAMPLES:
    jimaku-sync                                  # Process the current directory
    jimaku-sync /media/show-s01/                 # Process a specific directory
    jimaku-sync -k /media/show-s01/              # Keep staging directories for inspection
    jimaku-sync -l debug .                       # Process with debug logging
    jimaku-sync completions bash > jimaku.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

REQUIRED TOOLS:
    ffprobe    - subtitle stream inspection (part of ffmpeg)
    mkvextract - track extraction (part of mkvtoolnix)
    alass      - subtitle timing alignment")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Working directory holding the video releases and target subtitles
    #[arg(value_name = "DIRECTORY")]
    directory: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep staging directories after the run instead of removing them
    #[arg(short, long)]
    keep_artifacts: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker for log level
    fn get_marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            let mut stderr = std::io::stderr();
            let marker = Self::get_marker_for_level(record.level());
            let _ = match record.level() {
                Level::Error => writeln!(
                    stderr,
                    "\x1B[1;31m{} {} {}\x1B[0m",
                    now, marker, record.args()
                ),
                Level::Warn => writeln!(
                    stderr,
                    "\x1B[1;33m{} {} {}\x1B[0m",
                    now, marker, record.args()
                ),
                Level::Info => writeln!(
                    stderr,
                    "\x1B[1;32m{} {} {}\x1B[0m",
                    now, marker, record.args()
                ),
                Level::Debug => writeln!(
                    stderr,
                    "\x1B[1;36m{} {} {}\x1B[0m",
                    now, marker, record.args()
                ),
                Level::Trace => writeln!(
                    stderr,
                    "\x1B[1;35m{} {} {}\x1B[0m",
                    now, marker, record.args()
                ),
            };
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "jimaku-sync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Sync(args)) => {
            // Use the explicit sync subcommand args
            run_sync(args).await
        }
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let sync_args = SyncArgs {
                directory: cli.directory.unwrap_or_else(|| PathBuf::from(".")),
                config_path: cli.config_path,
                log_level: cli.log_level,
                keep_artifacts: cli.keep_artifacts,
            };
            run_sync(sync_args).await
        }
    }
}

async fn run_sync(options: SyncArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        let log_level = match config_log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };
        log::set_max_level(log_level);
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Update log level in config if specified via command line
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();

        // Apply command line log level to default config if specified
        if let Some(log_level) = &options.log_level {
            config.log_level = log_level.clone().into();
        }

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        let log_level = match config.log_level {
            app_config::LogLevel::Error => LevelFilter::Error,
            app_config::LogLevel::Warn => LevelFilter::Warn,
            app_config::LogLevel::Info => LevelFilter::Info,
            app_config::LogLevel::Debug => LevelFilter::Debug,
            app_config::LogLevel::Trace => LevelFilter::Trace,
        };

        // Just update the max level without reinitializing the logger
        log::set_max_level(log_level);
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    // Run the pipeline over the working directory
    if options.directory.is_dir() {
        controller.run(options.directory.clone(), options.keep_artifacts).await?;
    } else {
        return Err(anyhow!("Working directory does not exist: {:?}", options.directory));
    }

    Ok(())
}
