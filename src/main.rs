// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use sccfix::adapter::JobRunner;
use sccfix::app_config::{self, Config};
use sccfix::correction::{self, CorrectionContext};
use sccfix::errors::CorrectionError;
use sccfix::file_utils::FileManager;
use sccfix::timecode::FrameRate;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Process a queue event file, or every *.json event in a directory
    Run {
        /// Event file or directory of event files
        #[arg(value_name = "EVENT_PATH")]
        event_path: PathBuf,
    },

    /// Dry-run the correction of a local SCC file
    Inspect(InspectArgs),

    /// Generate shell completions for sccfix
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// SCC file to inspect
    #[arg(value_name = "SCC_FILE")]
    scc_file: PathBuf,

    /// First caption timecode as reported by media metadata
    #[arg(long)]
    scc_start: String,

    /// First video frame timecode
    #[arg(long)]
    video_start: String,

    /// Video frame rate (23.976, 24, 25, 29.97, 30; 50/59.94/60 are folded)
    #[arg(long)]
    video_rate: String,

    /// Write the corrected file into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// sccfix - SCC caption timing correction
///
/// Repairs hour offsets, vestigial headers, frame rate and drop-frame
/// mismatches in Scenarist SCC caption files.
#[derive(Parser, Debug)]
#[command(name = "sccfix")]
#[command(version)]
#[command(about = "SCC caption timing correction tool")]
#[command(long_about = "sccfix corrects the timing of SCC caption files so they match their video.

EXAMPLES:
    sccfix run event.json                                  # Process one queue event
    sccfix run events/                                     # Process every event in a directory
    sccfix inspect show.scc --scc-start 01:00:00;00 \\
        --video-start 00:00:00;00 --video-rate 29.97       # Dry run on a local file
    sccfix inspect show.scc ... --output fixed/            # Write the corrected file locally
    sccfix completions bash > sccfix.bash                  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The regionName, groupName and projectName
    environment variables override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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

    // @returns: ANSI colour and marker for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
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
            let (colour, marker) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                marker,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();
    if let Some(level) = cli.log_level {
        log::set_max_level(app_config::LogLevel::from(level).to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sccfix", &mut std::io::stdout());
            Ok(())
        }
        Commands::Run { event_path } => {
            let config = load_config(&cli.config_path, cli.log_level)?;
            run_events(&config, &event_path).await
        }
        Commands::Inspect(args) => {
            load_config(&cli.config_path, cli.log_level)?;
            inspect(&args)
        }
    }
}

fn load_config(config_path: &str, cli_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(config_path)?;
    config.apply_env_overrides();

    // Command line level wins over the file
    match cli_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    config.validate().context("Configuration validation failed")?;
    info!("Running as {}", config.identity());
    Ok(config)
}

async fn run_events(config: &Config, event_path: &Path) -> Result<()> {
    let runner = JobRunner::with_config(config)?;
    let records = runner.run_path(event_path).await?;

    let failed = records.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        warn!("{} of {} jobs failed", failed, records.len());
    } else {
        info!("Finished processing {} jobs", records.len());
    }
    Ok(())
}

fn inspect(args: &InspectArgs) -> Result<()> {
    let scc_text = FileManager::read_to_string(&args.scc_file)?;
    if !FileManager::looks_like_scc(&scc_text) {
        warn!("{:?} does not start with a Scenarist SCC header", args.scc_file);
    }

    let scc_filename = FileManager::file_name(&args.scc_file)
        .ok_or_else(|| anyhow!("Not a file path: {:?}", args.scc_file))?;
    let video_rate: FrameRate = sccfix::adapter::fold_frame_rate(&args.video_rate).parse()?;

    let (context, deduction) =
        CorrectionContext::deduce(&args.scc_start, &args.video_start, video_rate, &scc_text)?;

    println!("File:            {}", scc_filename);
    println!(
        "SCC frame rate:  {}{} ({} timecodes{})",
        context.scc_frame_rate,
        if context.scc_drop_frame { " DF" } else { "" },
        deduction.timecodes_seen,
        if deduction.confident { "" } else { ", low confidence" }
    );
    println!(
        "Video:           {}{} starting {}",
        context.video_frame_rate,
        if context.video_drop_frame { " DF" } else { "" },
        context.video_starting_timecode
    );

    let defects = correction::detect(&context);
    if defects.is_empty() {
        println!("Defects:         none");
    } else {
        let labels: Vec<String> = defects.iter().map(|d| d.to_string()).collect();
        println!("Defects:         {}", labels.join(", "));
    }

    let outcome = match correction::correct(&scc_filename, &scc_text, &context) {
        Ok(outcome) => outcome,
        Err(CorrectionError::NoCorrectionNeeded(message)) => {
            println!("Result:          {}", message);
            return Ok(());
        }
        Err(e) => {
            error!("Correction failed: {}", e);
            return Err(e.into());
        }
    };

    let steps: Vec<String> = outcome.applied.iter().map(|c| c.to_string()).collect();
    println!("Corrections:     {}", steps.join(" -> "));
    println!("Output name:     {}", outcome.filename);

    if let Some(output_dir) = &args.output {
        let path = output_dir.join(&outcome.filename);
        FileManager::write_to_file(&path, &outcome.text())?;
        info!("Success: {:?}", path);
    }

    Ok(())
}
