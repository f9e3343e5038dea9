// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::app_config::Config;
use crate::app_controller::Controller;
use crate::file_utils::FileManager;
use crate::upload::{AnnouncingUploader, Uploader};

mod app_config;
mod app_controller;
mod complexity;
mod errors;
mod file_utils;
mod media_extractor;
mod report;
mod selector;
mod subtitle_processor;
mod upload;

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

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

/// FilmFluency - complex-dialogue clip extraction
///
/// Reads a movie's SRT subtitles, scores every line with the Flesch Reading
/// Ease formula, and cuts the most complex dialogue out of the movie with
/// ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "filmfluency")]
#[command(version = "1.0.0")]
#[command(about = "Extract important dialogue clips from a movie")]
#[command(long_about = "FilmFluency scores subtitle lines by readability and extracts video clips
for the most complex dialogue.

EXAMPLES:
    filmfluency --movie film.mp4 --srt film.srt
    filmfluency --movie film.mp4 --srt film.srt --screenshot
    filmfluency --movie film.mp4 --srt film.srt --id tt0111161 --s3 s3://bucket/clips
    filmfluency --movie film.mp4 --srt film.srt --log-level debug

CONFIGURATION:
    Selection thresholds and extraction parameters are stored in conf.json by
    default. You can specify a different config file with --config-path. If
    the config file doesn't exist, a default one will be created automatically.

REQUIREMENTS:
    ffmpeg and ffprobe must be available on PATH.")]
struct CommandLineOptions {
    /// Path to the movie file
    #[arg(long, value_name = "PATH")]
    movie: PathBuf,

    /// Path to the SRT subtitle file
    #[arg(long, value_name = "PATH")]
    srt: PathBuf,

    /// Generate a screenshot for each clip
    #[arg(long)]
    screenshot: bool,

    /// Remote upload destination (requires --id)
    #[arg(long, value_name = "URL", requires = "id")]
    s3: Option<String>,

    /// Movie identifier used in output naming and upload keys
    #[arg(long, value_name = "STRING")]
    id: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
        return ExitCode::FAILURE;
    }

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    // Load or create configuration
    let config = load_config(&options.config_path, options.log_level.as_ref())?;

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    // Apply CLI extraction toggles
    let mut config = config;
    if options.screenshot {
        config.extraction.screenshot = true;
    }

    let controller = Controller::with_config(config)?;

    let uploader: Option<Box<dyn Uploader>> = options
        .s3
        .as_ref()
        .map(|url| Box::new(AnnouncingUploader::new(url.clone())) as Box<dyn Uploader>);

    // Per-entry failures are logged inside the run and do not fail the exit
    // code; only setup errors propagate out of here.
    controller
        .run(
            &options.movie,
            &options.srt,
            options.id.as_deref(),
            uploader.as_deref(),
        )
        .await?;

    Ok(())
}

fn load_config(config_path: &str, cli_log_level: Option<&CliLogLevel>) -> Result<Config> {
    if Path::new(config_path).exists() {
        let content = FileManager::read_to_string(config_path)?;
        let mut config: Config = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", config_path))?;

        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        Ok(config)
    } else {
        // Create default configuration if not exists
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );

        let mut config = Config::default();
        if let Some(log_level) = cli_log_level {
            config.log_level = log_level.clone().into();
        }

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(config_path, &config_json)?;

        Ok(config)
    }
}
