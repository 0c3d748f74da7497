// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use telop::alignment::{into_sections, load_alignment};
use telop::app_config::{self, Config};
use telop::errors::AppError;
use telop::file_utils::FileManager;
use telop::impact::{ImpactAnnotator, ImpactPhrases};
use telop::segmentation::segment_and_time;
use telop::subtitle_processor::CueCollection;
use telop::validation::CueValidator;

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment an alignment file into subtitles and a timing record
    Generate(GenerateArgs),

    /// Check an existing SRT file against the layout and timing rules
    Validate(ValidateArgs),

    /// Generate shell completions for telop
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Alignment JSON with per-character timings
    #[arg(value_name = "ALIGNMENT")]
    alignment_path: PathBuf,

    /// Narration script JSON carrying impact sentences
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Output directory for subtitles.srt and subtitle_timing.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Subject name written to the timing record (default: alignment file stem)
    #[arg(long)]
    subject: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "telop.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// SRT file to check
    #[arg(value_name = "SRT_FILE")]
    srt_path: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "telop.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// telop - Japanese narration subtitle generator
///
/// Splits timed narration into readable two-line subtitles.
#[derive(Parser, Debug)]
#[command(name = "telop")]
#[command(version)]
#[command(about = "Japanese narration subtitle segmentation and timing")]
#[command(long_about = "telop turns narration text with character-level timestamps into SRT subtitles.

EXAMPLES:
    telop generate audio_timing.json                      # Write subtitles to the current directory
    telop generate audio_timing.json -s script.json -o out/  # Tag impact sentences, write to out/
    telop validate out/subtitles.srt                      # Check line widths, durations and gaps
    telop completions bash > telop.bash                   # Generate bash completions

CONFIGURATION:
    Configuration is stored in telop.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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
        // Records are filtered by the global max level, which may be raised later
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Start at info, the config may change it once loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "telop", &mut std::io::stdout());
            Ok(())
        }
        Commands::Generate(args) => Ok(run_generate(args)?),
        Commands::Validate(args) => run_validate(args),
    }
}

/// Load the configuration, creating a default file when none exists
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    // Apply a command line log level immediately
    if let Some(level) = &log_level {
        log::set_max_level(level_filter(&level.clone().into()));
    }

    let mut config = if FileManager::file_exists(config_path) {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    match log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(level_filter(&config.log_level)),
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = load_config(&args.config_path, args.log_level.clone())?;
    let settings = &config.segmentation;

    let sections = into_sections(
        load_alignment(&args.alignment_path)?,
        settings.fallback_seconds_per_char,
    )?;

    let mut cues = segment_and_time(&sections, settings)?;

    if let Some(script_path) = &args.script {
        let phrases = ImpactPhrases::from_script_file(script_path)?;
        if phrases.is_empty() {
            info!("No impact sentences in {}", script_path.display());
        } else {
            let tagged = ImpactAnnotator::new(&phrases).annotate(&mut cues);
            info!("Tagged {} cue(s) as impact sentences", tagged);
        }
    }

    let subject = args
        .subject
        .unwrap_or_else(|| FileManager::subject_from_path(&args.alignment_path));
    write_outputs(&CueCollection::new(cues), &args.output_dir, &subject)
}

fn write_outputs(collection: &CueCollection, output_dir: &Path, subject: &str) -> Result<(), AppError> {
    FileManager::ensure_dir(output_dir)?;
    let (srt_path, timing_path) = FileManager::output_paths(output_dir);

    FileManager::write_to_file(&srt_path, &collection.to_srt()?)?;
    collection.write_timing_json(&timing_path, subject)?;

    info!("Wrote {} cue(s) to {}", collection.cues.len(), srt_path.display());
    info!("Timing record: {}", timing_path.display());
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;
    let collection = CueCollection::from_srt_file(&args.srt_path)?;

    let report = CueValidator::new(&config.segmentation).validate(&collection.cues);
    let issues = report.issues();
    for issue in &issues {
        warn!("{}", issue);
    }

    if report.passed() {
        info!(
            "{}: {} cue(s), longest line {} characters, no issues",
            args.srt_path.display(),
            collection.cues.len(),
            report.layout.longest_line
        );
        Ok(())
    } else {
        let timing_failures = report.timecodes.failed_entries();
        if let Some(first) = timing_failures.first() {
            info!(
                "{} cue(s) with timing problems, first at cue {}",
                timing_failures.len(),
                first.index
            );
        }
        Err(anyhow::anyhow!(
            "{}: {} issue(s) in {} cue(s)",
            args.srt_path.display(),
            issues.len(),
            collection.cues.len()
        ))
    }
}
