// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use plotlingo::app_config::{self, Config, TranslationProvider};
use plotlingo::app_controller::Controller;
use plotlingo::translation::prompts::ReportSection;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deepseek")]
    DeepSeek,
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepSeek => TranslationProvider::DeepSeek,
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

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
    /// Translate the text of plotting scripts (default command)
    Translate(TranslateArgs),

    /// Write a Markdown analysis report for a script
    Analyze(AnalyzeArgs),

    /// Rename a script's variables according to a naming standard
    Rename(RenameArgs),

    /// Generate shell completions for plotlingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that talks to a provider
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Text-generation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use
    #[arg(short, long)]
    model: Option<String>,

    /// Target language code (e.g., 'zh', 'zh-TW', 'ja')
    #[arg(short, long)]
    target_language: Option<String>,

    /// API key, overrides the config file and the provider's environment variable
    #[arg(long, env = "PLOTLINGO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// Input script or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Also rework the figure layout after translating
    #[arg(short, long)]
    beautify: bool,

    /// Suffix appended to the output file stem
    #[arg(long)]
    suffix: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Script to analyse
    #[arg(value_name = "INPUT_FILE")]
    input_path: PathBuf,

    /// Report sections, comma separated (summary, structure, math); all by default
    #[arg(short, long, value_delimiter = ',')]
    sections: Vec<ReportSection>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct RenameArgs {
    /// Script whose variables are renamed
    #[arg(value_name = "INPUT_FILE")]
    input_path: PathBuf,

    /// Naming standards document
    #[arg(short, long)]
    standards: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

/// plotlingo - translate the text of Python plotting scripts with AI
#[derive(Parser, Debug)]
#[command(name = "plotlingo")]
#[command(version)]
#[command(about = "AI-powered translation of plot labels and comments in Python scripts")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "plotlingo translates plot titles, axis labels, legends and comments of Python
plotting scripts, injects CJK font support for matplotlib, and writes the result
next to the input as <name>_zh_revision.py. The input file is never modified.

EXAMPLES:
    plotlingo plot.py                            # Translate using default config
    plotlingo -f plot.py                         # Force overwrite existing output
    plotlingo -b plot.py                         # Translate and rework the layout
    plotlingo -p ollama -m qwen2.5:7b plot.py    # Use a specific provider and model
    plotlingo -t ja scripts/                     # Translate every script below a folder
    plotlingo analyze -s summary,math fit.py     # Write fit_analysis.md
    plotlingo rename -s naming.md fit.py         # Write fit_redefined.py
    plotlingo completions bash > plotlingo.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    deepseek  - DeepSeek API (default: deepseek-chat, key from DEEPSEEK_API_KEY)
    openai    - OpenAI API (key from OPENAI_API_KEY)
    anthropic - Anthropic Claude API (key from ANTHROPIC_API_KEY)
    ollama    - Local Ollama server (default: llama3.2:3b)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input script or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Also rework the figure layout after translating
    #[arg(short, long)]
    beautify: bool,

    /// Suffix appended to the output file stem
    #[arg(long)]
    suffix: Option<String>,

    #[command(flatten)]
    common: CommonArgs,
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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
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

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the max level set after loading the config filters
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "plotlingo", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        Some(Commands::Analyze(args)) => run_analyze(args).await,
        Some(Commands::Rename(args)) => run_rename(args).await,
        None => {
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_translate(TranslateArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                beautify: cli.beautify,
                suffix: cli.suffix,
                common: cli.common,
            }).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let config = load_config(&options.common, |config| {
        if options.beautify {
            config.output.beautify = true;
        }
        if let Some(suffix) = &options.suffix {
            config.output.suffix = suffix.clone();
        }
    })?;

    let controller = Controller::with_config(config)?;

    if options.input_path.is_file() {
        controller.run(options.input_path.clone(), options.force_overwrite).await?;
    } else if options.input_path.is_dir() {
        let summary = controller.run_folder(options.input_path.clone(), options.force_overwrite).await?;
        if summary.errors > 0 {
            warn!("{} files failed, see the errors above", summary.errors);
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    info!("{}", controller.collaborator().usage().summary());
    Ok(())
}

async fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    let config = load_config(&options.common, |_| {})?;
    let controller = Controller::with_config(config)?;
    let report = controller.analyze(options.input_path, &options.sections).await?;
    println!("{}", report.display());
    Ok(())
}

async fn run_rename(options: RenameArgs) -> Result<()> {
    let config = load_config(&options.common, |_| {})?;
    let controller = Controller::with_config(config)?;
    let renamed = controller.rename(options.input_path, options.standards).await?;
    println!("{}", renamed.display());
    Ok(())
}

/// Load or create the configuration, apply CLI overrides and validate
fn load_config(options: &CommonArgs, overrides: impl FnOnce(&mut Config)) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();

        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.translation.active_provider_config_mut().model = model.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.active_provider_config_mut().api_key = api_key.clone();
    }
    overrides(&mut config);
    config.translation.apply_api_key_from_env();

    config.validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}
