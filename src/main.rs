//! FormInsight - anonymous forms, collected locally
//!
//! A CLI tool for creating forms with multiple-choice and free-text
//! questions, collecting responses into a local store, and reading
//! statistics and scripted insights about them.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (invalid form, rejected submission, form not found, I/O, etc.)

mod analysis;
mod builder;
mod cli;
mod commands;
mod config;
mod ids;
mod models;
mod notify;
mod report;
mod share;
mod store;

use anyhow::{Context as _, Result};
use cli::{Args, Command};
use commands::Context;
use config::{Config, CONFIG_FILE};
use ids::SystemIds;
use notify::{ConsoleNotifier, Notifier};
use store::JsonFileStore;
use std::path::PathBuf;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first, the log level depends on it
    let (config, source) = load_config(&args);
    let mut config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    debug!("FormInsight v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    let notifier = ConsoleNotifier::new(args.quiet);

    match run(args, config, notifier).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Command failed: {:#}", e);
            notifier.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .forminsight.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the data directory, share URL, and more.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch the requested command.
async fn run(args: Args, config: Config, notifier: ConsoleNotifier) -> Result<()> {
    let kv = JsonFileStore::new(config.general.data_dir.clone());
    debug!("Using form store in {}", kv.dir().display());

    let mut ctx = Context {
        config,
        kv,
        ids: Box::new(SystemIds),
        notifier,
        show_progress: !args.quiet,
    };

    // validate() guarantees a command unless --init-config was given
    let Some(command) = args.command else {
        return Ok(());
    };

    match command {
        Command::Create { file } => {
            let form_id = ctx.create(&file)?;
            println!("   Form id: {}", form_id);
            println!("   Share it with: forminsight share {}", form_id);
        }
        Command::List => print!("{}", ctx.list()?),
        Command::Show { form } => print!("{}", ctx.show(&form)?),
        Command::Submit { form, answers } => {
            let response_id = ctx.submit(&form, &answers)?;
            debug!("Response id: {}", response_id);
        }
        Command::Toggle { form } => {
            ctx.toggle(&form)?;
        }
        Command::Stats {
            form,
            format,
            output,
        } => {
            let report = ctx.stats(&form, format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &report)
                        .with_context(|| format!("Failed to write report to {}", path.display()))?;
                    ctx.notifier
                        .success(&format!("Report saved to: {}", path.display()));
                }
                None => print!("{}", report),
            }
        }
        Command::Insights { form } => {
            let text = ctx.insights(&form).await?;
            println!("🧠 Insights\n\n{}", text);
        }
        Command::Share { form, svg } => {
            print!("{}", ctx.share(&form, svg.as_deref()).await?);
        }
    }

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    Unreadable(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE),
            ConfigSource::BuiltIn => debug!("No config file found, using defaults"),
            ConfigSource::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> (Result<Config>, ConfigSource) {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return (
            Config::load(config_path),
            ConfigSource::Explicit(config_path.clone()),
        );
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => (Ok(config), ConfigSource::DefaultFile),
        Ok(None) => (Ok(Config::default()), ConfigSource::BuiltIn),
        Err(e) => (Ok(Config::default()), ConfigSource::Unreadable(e)),
    }
}
