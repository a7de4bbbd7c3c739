// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use subseek::app_config::{mask_secret, Config, LogLevel, ProviderKind, TranslationCredentials};
use subseek::app_controller::{Controller, ControllerEvent, TranslatedMatch};
use subseek::corpus::LoadSummary;
use subseek::search::SearchResults;

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProvider {
    Azure,
    Google,
    GoogleFree,
    Deepl,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Azure => ProviderKind::Azure,
            CliProvider::Google => ProviderKind::Google,
            CliProvider::GoogleFree => ProviderKind::GoogleFree,
            CliProvider::Deepl => ProviderKind::DeepL,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Credential values given on the command line; unset flags keep stored values
#[derive(clap::Args, Debug, Default)]
struct CredentialArgs {
    /// Azure subscription key
    #[arg(long, env = "SUBSEEK_AZURE_KEY")]
    azure_key: Option<String>,

    /// Azure resource region (e.g. 'eastasia')
    #[arg(long, env = "SUBSEEK_AZURE_REGION")]
    azure_region: Option<String>,

    /// Google Cloud Translation API key
    #[arg(long, env = "SUBSEEK_GOOGLE_KEY")]
    google_key: Option<String>,

    /// DeepL authentication key
    #[arg(long, env = "SUBSEEK_DEEPL_KEY")]
    deepl_key: Option<String>,
}

impl CredentialArgs {
    // @returns: Stored credentials with the given flags applied on top
    fn apply_to(&self, stored: &TranslationCredentials) -> TranslationCredentials {
        let mut credentials = stored.clone();
        if let Some(key) = &self.azure_key {
            credentials.azure_key = key.clone();
        }
        if let Some(region) = &self.azure_region {
            credentials.azure_region = region.clone();
        }
        if let Some(key) = &self.google_key {
            credentials.google_key = key.clone();
        }
        if let Some(key) = &self.deepl_key {
            credentials.deepl_key = key.clone();
        }
        credentials
    }
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active provider and which credentials are set
    Show,

    /// Select the active provider ('none' to deselect)
    SetProvider {
        /// azure, google, google_free, deepl or none
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },

    /// Store credentials; flags that are not given keep their current value
    SetCredentials(CredentialArgs),
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load subtitle files and search their text
    Search {
        /// Text to look for (case-insensitive)
        #[arg(value_name = "QUERY")]
        query: String,

        /// Subtitle files or directories to load
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Translate every match with the active provider
        #[arg(short, long)]
        translate: bool,
    },

    /// Load subtitle files and list them with entry counts
    List {
        /// Subtitle files or directories to load
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Translate a single text with the active provider
    Translate {
        /// Text to translate
        #[arg(value_name = "TEXT")]
        text: String,
    },

    /// Check that a provider answers with the given or stored credentials
    Probe {
        /// Provider to test
        #[arg(value_enum)]
        provider: CliProvider,

        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Inspect or change the translator configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions for subseek
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subseek - search subtitle files and translate what you find
#[derive(Parser, Debug)]
#[command(name = "subseek")]
#[command(version = "0.1.0")]
#[command(about = "Search SRT subtitles and translate matching lines")]
#[command(long_about = "subseek loads SRT subtitle files (UTF-8, GBK or UTF-16), searches their text
and translates matching lines through Azure, Google, Google (free) or DeepL.

EXAMPLES:
    subseek search hello movie.srt                  # Search one file
    subseek search -t 'good night' ./subs/          # Search a directory, translate matches
    subseek list ./subs/                            # Show loaded files and entry counts
    subseek config set-provider google_free         # Use the free Google endpoint
    subseek config set-credentials --deepl-key KEY  # Store a DeepL key
    subseek probe deepl --deepl-key KEY             # Test a key without saving it
    subseek completions bash > subseek.bash         # Generate bash completions

CONFIGURATION:
    Settings live in translator_config.json under the user configuration
    directory unless --config is given. A missing or unreadable file means
    no provider and empty credentials.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

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
        // The logger itself lets everything through; `set_max_level` does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and marker for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "❌"),
            Level::Warn => ("\x1B[1;33m", "🚧"),
            Level::Info => ("\x1B[1;32m", ""),
            Level::Debug => ("\x1B[1;36m", "🔍"),
            Level::Trace => ("\x1B[1;35m", "📋"),
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
            let (color, marker) = Self::style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the configuration has been read
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subseek", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut controller = Controller::with_config_path(&config_path);

    let log_level = match cli.log_level {
        Some(level) => LogLevel::from(level),
        None => controller.config().log_level,
    };
    log::set_max_level(log_level.to_level_filter());

    match cli.command {
        Commands::Search { query, paths, translate } => run_search(&mut controller, &query, &paths, translate).await,
        Commands::List { paths } => run_list(&mut controller, &paths),
        Commands::Translate { text } => {
            let translation = controller.translate(&text).await?;
            println!("{}", translation);
            Ok(())
        }
        Commands::Probe { provider, credentials } => {
            let credentials = credentials.apply_to(&controller.config().credentials);
            let outcome = controller.probe_provider(provider.into(), Some(&credentials)).await;
            if outcome.ok {
                info!("{}", outcome.message);
                Ok(())
            } else {
                Err(anyhow!(outcome.message))
            }
        }
        Commands::Config { action } => run_config(&mut controller, action, &config_path),
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_search(controller: &mut Controller, query: &str, paths: &[PathBuf], translate: bool) -> Result<()> {
    let summary = controller.load_files(paths)?;
    report_load(&summary);
    if controller.corpus().is_empty() {
        return Err(anyhow!("No subtitle files could be loaded"));
    }

    let results = controller.search(query).await?;
    print_results(&results);

    if !translate {
        return Ok(());
    }
    if results.is_empty() {
        warn!("Nothing to translate");
        return Ok(());
    }

    let translated = translate_results(controller, results.len()).await?;
    for item in translated {
        println!("{} [{}]", item.record.file_identifier, item.record.timestamp);
        println!("    {}", item.record.original_text);
        println!("    {}", item.translation);
    }
    Ok(())
}

// Drive translate-all from the event loop so the bar follows worker progress
async fn translate_results(controller: &mut Controller, total: usize) -> Result<Vec<TranslatedMatch>> {
    controller.submit_translate_all()?;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .map_err(|e| anyhow!("Invalid progress bar template: {}", e))?
            .progress_chars("█▓▒░"),
    );
    pb.set_message("Translating");

    while let Some(event) = controller.next_event().await? {
        match event {
            ControllerEvent::TranslationProgress { completed, .. } => pb.set_position(completed as u64),
            ControllerEvent::ResultsTranslated(translated) => {
                pb.finish_with_message("Translation complete");
                return Ok(translated);
            }
            _ => {}
        }
    }

    pb.abandon();
    Err(anyhow!("Translation finished without producing results"))
}

fn run_list(controller: &mut Controller, paths: &[PathBuf]) -> Result<()> {
    let summary = controller.load_files(paths)?;
    report_load(&summary);

    for file in controller.corpus().files() {
        println!("{}\t{} entries\t{}", file.identifier(), file.entries().len(), file.encoding());
    }
    println!("{} file(s), {} entries", controller.corpus().len(), controller.corpus().total_entries());
    Ok(())
}

fn run_config(controller: &mut Controller, action: ConfigAction, config_path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = controller.config();
            let credentials = &config.credentials;
            println!("Configuration file: {}", config_path.display());
            println!(
                "Active provider: {}",
                config.active_provider.map(|p| p.display_name()).unwrap_or("none")
            );
            println!("Azure key: {}", mask_secret(&credentials.azure_key));
            println!("Azure region: {}", display_or_unset(&credentials.azure_region));
            println!("Google key: {}", mask_secret(&credentials.google_key));
            println!("DeepL key: {}", mask_secret(&credentials.deepl_key));
            for (kind, endpoint) in &config.endpoints {
                println!("{} endpoint: {}", kind.display_name(), endpoint);
            }
            Ok(())
        }
        ConfigAction::SetProvider { provider } => {
            let kind = if provider.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(provider.parse::<ProviderKind>()?)
            };
            controller.set_active_provider(kind)?;
            info!(
                "Active provider set to {}",
                kind.map(|k| k.display_name()).unwrap_or("none")
            );
            Ok(())
        }
        ConfigAction::SetCredentials(args) => {
            let credentials = args.apply_to(&controller.config().credentials);
            controller.set_credentials(credentials)?;
            info!("Credentials saved to {}", config_path.display());
            Ok(())
        }
    }
}

fn report_load(summary: &LoadSummary) {
    info!("{}", summary);
    let skipped = summary.skipped().count();
    if skipped > 0 {
        info!("Skipped {} already loaded file(s)", skipped);
    }
    if summary.failures.len() > skipped {
        error!("Some files could not be loaded:\n{}", summary.failure_report());
    }
}

fn print_results(results: &SearchResults) {
    if results.is_empty() {
        println!("No matches for {:?}", results.query);
        return;
    }

    for (identifier, records) in results.grouped() {
        println!("== {} ({} matches)", identifier, records.len());
        for record in records {
            println!("  [{}] {}", record.timestamp, record.original_text);
        }
    }
    println!("{} match(es) for {:?}", results.len(), results.query);
}

fn display_or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}
