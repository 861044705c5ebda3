//! Calorie Counter CLI
//!
//! Looks up calories per serving for free-text dish names against USDA
//! FoodData Central, and issues the bearer tokens the lookup requires.

use calorie_core::config::Config;
use calorie_telemetry::TelemetryConfig;
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{detail, lookup, token};

/// Calorie lookups backed by USDA FoodData Central
#[derive(Parser)]
#[command(name = "calorie-counter")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to calorie-counter.toml in standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Text,
    /// One JSON document on stdout
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate calories for a dish
    Lookup {
        /// Dish name, e.g. "apple pie"
        dish: String,

        /// Number of servings
        #[arg(short, long, default_value = "1")]
        servings: u32,

        /// Bearer token (a short-lived one is issued locally if omitted)
        #[arg(short, long, env = "CALORIE_TOKEN")]
        token: Option<String>,
    },

    /// Show extracted nutrition for one FoodData Central record
    Detail {
        /// FoodData Central id
        fdc_id: i64,
    },

    /// Issue and check bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Issue a token for a subject
    Issue {
        /// Subject, usually an email address
        subject: String,
    },

    /// Verify a token and print its claims
    Verify {
        /// Token to check
        token: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let telemetry = if cli.verbose {
        TelemetryConfig::verbose()
    } else {
        TelemetryConfig::default()
    };
    if let Err(e) = calorie_telemetry::init_with_config(&telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Lookup {
            dish,
            servings,
            token,
        } => {
            lookup::run(
                &config,
                &dish,
                servings,
                token.as_deref(),
                cli.format,
                cli.verbose,
            )
            .await
        },

        Commands::Detail { fdc_id } => detail::run(&config, fdc_id, cli.format).await,

        Commands::Token { action } => match action {
            TokenAction::Issue { subject } => token::issue(&config, &subject, cli.format),
            TokenAction::Verify { token } => token::verify(&config, &token, cli.format),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
