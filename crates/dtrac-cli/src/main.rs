//! dtrac CLI tool.
//!
//! Usage:
//! ```bash
//! dtrac analyze [OPTIONS] [PATH]
//! dtrac layers <CLASS>
//! dtrac list-collectors
//! dtrac init
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod depfile_loader;

/// Enforce layered architecture rules over a class map
#[derive(Parser)]
#[command(name = "dtrac")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the depfile
    #[arg(short, long, global = true, env = "DTRAC_DEPFILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check dependencies against the ruleset
    Analyze {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Class map to analyze (overrides `[analyzer] class_map`)
        #[arg(long)]
        class_map: Option<PathBuf>,

        /// Output format (overrides `[analyzer] formatter`)
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Show which layers a class belongs to
    Layers {
        /// Fully qualified class name
        class: String,

        /// Project directory (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,

        /// Class map to resolve against
        #[arg(long)]
        class_map: Option<PathBuf>,
    },

    /// List available collector types
    ListCollectors,

    /// Initialize a depfile
    Init {
        /// Overwrite existing depfile
        #[arg(long)]
        force: bool,
    },
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable violations with inheritance paths.
    #[default]
    Text,
    /// JSON report.
    Json,
    /// One line per violation.
    Compact,
    /// Graphviz layer graph.
    Dot,
}

/// Exit status when the ruleset was violated.
const EXIT_VIOLATIONS: u8 = 1;
/// Exit status for configuration and I/O failures.
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Analyze {
            path,
            class_map,
            format,
        } => commands::analyze::run(&path, class_map.as_deref(), format, cli.config.as_deref()),
        Commands::Layers {
            class,
            path,
            class_map,
        } => commands::layers::run(&class, &path, class_map.as_deref(), cli.config.as_deref())
            .map(|()| true),
        Commands::ListCollectors => {
            commands::list_collectors::run();
            Ok(true)
        }
        Commands::Init { force } => commands::init::run(force).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_VIOLATIONS),
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
