mod clock;
mod config;
mod countdown;
mod dashboard;
mod overlay;
mod quotes;
mod terminal;
mod ticker;

use crate::clock::SystemClock;
use crate::config::{Config, Overrides, Settings};
use crate::dashboard::Dashboard;
use crate::quotes::QuoteRotator;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "countdown")]
#[command(about = "Countdown display with progress and rotating quotes for Linux")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (default: ~/.config/countdown/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Date or date-time to count down to, in local time (e.g. 2025-06-10T00:00:00)
    #[arg(long, global = true)]
    target: Option<String>,

    /// Date or date-time progress is measured from, in local time
    #[arg(long, global = true)]
    start: Option<String>,

    /// Heading text shown above the countdown
    #[arg(long, global = true)]
    heading: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full-screen Wayland overlay (default)
    Show,

    /// Show the countdown in the terminal until Ctrl-C
    Watch,

    /// Print the current countdown once
    Status {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a random quote
    Quote,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    settings.apply(Overrides {
        start: cli.start.clone(),
        target: cli.target.clone(),
        heading: cli.heading.clone(),
    });
    let config = settings.resolve().context("Invalid settings")?;

    log::debug!(
        "Counting down from {} to {}",
        config.countdown.start(),
        config.countdown.target()
    );
    Ok(config)
}

fn status(config: Config, format: OutputFormat) -> Result<()> {
    let mut dashboard = Dashboard::new(
        config.heading,
        config.countdown,
        SystemClock,
        QuoteRotator::new(config.quotes),
    );
    dashboard.rotate_quote();
    let snapshot = dashboard.snapshot();

    match format {
        OutputFormat::Text => println!("{}", snapshot),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            overlay::run(config).context("Overlay failed")?;
        }

        Commands::Watch => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(terminal::run(config))?;
        }

        Commands::Status { format } => status(config, format)?,

        Commands::Quote => {
            let mut rotator = QuoteRotator::new(config.quotes);
            let quote = rotator.next_quote();
            println!("{}", quote.text);
            println!("{}", dashboard::attribution(&quote.author));
        }
    }

    Ok(())
}
