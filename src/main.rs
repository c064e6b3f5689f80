// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use memo::app_config::{self, Config, LogLevel};
use memo::database::Store;
use memo::messaging;
use memo::word::{add_word_pair, find_by_value};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store two words as translations of each other, creating missing words
    Add {
        /// First word of the pair
        first: String,
        /// Its translation
        second: String,
    },

    /// Check whether two words are translations of each other
    Check {
        /// First word of the pair
        first: String,
        /// Supposed translation
        second: String,
    },

    /// Show a word with its answer statistics and translations
    Show {
        /// Word to show
        word: String,
    },

    /// Send a test of the worst answered words
    Test {
        /// Address the test is sent to
        address: String,

        /// Number of words, overriding the configuration
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Process a reply to a test
    Reply {
        /// File containing the reply; stdin is read when omitted
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store statistics
    Stats,

    /// Generate shell completions for memo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// memo - a personal vocabulary store
///
/// Keeps words and their translations in an SQLite database and tests you
/// on them by mail.
#[derive(Parser, Debug)]
#[command(name = "memo")]
#[command(version)]
#[command(about = "Personal vocabulary store with mail-based tests")]
#[command(long_about = "memo keeps words and their translations and tests you on them by mail.

EXAMPLES:
    memo add wąż serpiente               # Store a translation pair
    memo check serpiente wąż             # Is it a known translation?
    memo show wąż                        # Statistics and translations of a word
    memo test -n 20 me@example.org       # Mail a test of the 20 worst words
    memo reply < reply.eml               # Record the answers of a reply
    memo completions bash > memo.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in ~/.memo/conf.json by default. You can specify
    a different config file with --config. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", global = true)]
    config_path: Option<PathBuf>,

    /// Database file, overriding the configuration
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
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
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                tag,
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
    // The level is adjusted once the configuration is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "memo", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.into());
    config.validate().context("Invalid configuration")?;

    let store = Store::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;

    let result = run_command(cli.command, &store, &config).await;
    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    store.close();
    result
}

/// Load the configuration file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path = cli
        .config_path
        .clone()
        .unwrap_or_else(app_config::default_config_path);

    let mut config = Config::load_or_create(&config_path)?;

    if let Some(database) = &cli.database {
        config.database_path = database.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}

async fn run_command(command: Commands, store: &Store, config: &Config) -> Result<()> {
    match command {
        Commands::Add { first, second } => {
            add_word_pair(store, &first, &second)
                .with_context(|| format!("Failed to add '{}' - '{}'", first, second))?;
            info!("Added '{}' - '{}'", first, second);
        }
        Commands::Check { first, second } => {
            let first_word = find_by_value(store, &first)?
                .ok_or_else(|| anyhow!("Unknown word '{}'", first))?;
            let second_word = find_by_value(store, &second)?
                .ok_or_else(|| anyhow!("Unknown word '{}'", second))?;

            if first_word.check_translation(&second_word) {
                println!("'{}' is a translation of '{}'", second, first);
            } else {
                println!("'{}' is not a translation of '{}'", second, first);
            }
        }
        Commands::Show { word } => {
            let mut word = find_by_value(store, &word)?
                .ok_or_else(|| anyhow!("Unknown word '{}'", word))?;

            let value = word.value()?.to_owned();
            let positive = word.positive_answers()?;
            let negative = word.negative_answers()?;
            println!("{} (correct: {}, wrong: {})", value, positive, negative);
            for mut translation in word.get_translations()? {
                println!("  {}", translation.value()?);
            }
        }
        Commands::Test { address, count } => {
            let count = count.unwrap_or(config.messaging.test_word_count);
            let quiz = messaging::send_test(store, &config.messaging, count, &address)
                .await
                .context("Failed to send test")?;
            println!("Sent {} questions to {}", quiz.questions().len(), address);
        }
        Commands::Reply { file, json } => {
            let script = &config.messaging.reply_parse_script;
            let report = match file {
                Some(path) => {
                    let reply = tokio::fs::File::open(&path).await.with_context(|| {
                        format!("Failed to open reply {}", path.display())
                    })?;
                    messaging::check_reply(store, reply, script).await
                }
                None => messaging::check_reply(store, tokio::io::stdin(), script).await,
            }
            .context("Failed to process reply")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
        Commands::Stats => {
            println!("{}", store.stats()?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
