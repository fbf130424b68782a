#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use polytrans::app_config::{self, Config};
use polytrans::app_controller::Controller;

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
    /// Translate documents into the target languages (default command)
    Translate(TranslateArgs),

    /// Remove cache entries that were not used for a number of days
    CleanCache {
        /// Retention in days (defaults to the configured value)
        #[arg(long)]
        days: Option<i64>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Generate shell completions for polytrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Documents or directories to translate
    #[arg(value_name = "INPUT")]
    inputs: Vec<PathBuf>,

    /// Additional input file (repeatable)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input_files: Vec<PathBuf>,

    /// Target languages, comma separated, or "all"
    #[arg(short, long = "language", value_delimiter = ',')]
    languages: Vec<String>,

    /// Translation engine used by the translator command
    #[arg(short, long)]
    engine: Option<String>,

    /// Source language code, or "auto"
    #[arg(short, long = "source")]
    source_language: Option<String>,

    /// Simultaneous translations
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Ignore cached translations
    #[arg(short, long)]
    force: bool,

    /// Root directory for translated files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Report debug details
    #[arg(short, long)]
    verbose: bool,
}

/// polytrans - translate documents into many languages at once
#[derive(Parser, Debug)]
#[command(name = "polytrans")]
#[command(version)]
#[command(about = "Concurrent, cached document translation through a command line translator")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "polytrans splits documents into text units and translates every unit into every
target language with an external translator command, reusing a persistent cache.

EXAMPLES:
    polytrans README.md                         # Translate into the default languages
    polytrans -l es,fr -j 4 README.md           # Two languages, four simultaneous calls
    polytrans -l all -f docs/                   # Every language, ignoring the cache
    polytrans clean-cache --days 7              # Drop entries unused for a week
    polytrans completions bash > polytrans.bash # Generate bash completions

OUTPUT:
    Translations are written below the output root, in a directory per format
    (doc, txt, json, html, pot), named <name>-<lang>.<ext>.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
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

    // @returns: Color code and emoji for log level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌"),
            Level::Warn => ("1;33", "🚧"),
            Level::Info => ("1;32", " "),
            Level::Debug => ("1;36", "🔍"),
            Level::Trace => ("1;35", "📋"),
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
            let (color, emoji) = Self::decoration(record.level());
            let _ = writeln!(std::io::stderr(), "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here, the effective level is set once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "polytrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::CleanCache { days, config }) => {
            let config = load_config(config)?;
            log::set_max_level(level_filter(&config.log_level));
            let controller = Controller::with_config(config)?;
            let removed = controller.clean_cache(days)?;
            info!("Cache cleaned, {} entries removed", removed);
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => run_translate(cli.translate).await,
    }
}

/// Load the configuration file, writing a default one when it is missing
fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(Config::default_path);

    if path.exists() {
        return Config::load(&path);
    }

    warn!("Config file not found at '{}', creating default config.", path.display());
    let config = Config::default();
    if let Err(e) = config.save(&path) {
        warn!("Could not write default config: {:#}", e);
    }
    Ok(config)
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(options.config.clone())?;

    // Command line options override file values
    if !options.languages.is_empty() {
        config.target_languages = options.languages.clone();
    }
    if let Some(engine) = &options.engine {
        config.engine = engine.clone();
    }
    if let Some(source) = &options.source_language {
        config.source_language = source.clone();
    }
    if let Some(jobs) = options.jobs {
        config.jobs = jobs;
    }
    if options.force {
        config.force = true;
    }
    if let Some(level) = &options.log_level {
        config.log_level = level.clone().into();
    } else if options.quiet {
        config.log_level = app_config::LogLevel::Warn;
    } else if options.verbose {
        config.log_level = app_config::LogLevel::Debug;
    }

    log::set_max_level(level_filter(&config.log_level));

    config.validate().context("Configuration validation failed")?;

    let inputs: Vec<PathBuf> = options
        .inputs
        .iter()
        .chain(options.input_files.iter())
        .cloned()
        .collect();
    if inputs.is_empty() {
        return Err(anyhow!("At least one INPUT is required"));
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run(&inputs, &options.output).await?;

    info!("{} files written", summary.written.len());
    Ok(())
}
