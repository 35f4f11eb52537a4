//! examlens CLI: exam response analytics from the terminal.

mod commands;
mod generate;
mod output;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// examlens: question quality, learning gaps and rankings from exam responses
#[derive(Parser, Debug)]
#[command(name = "examlens", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (holds .examlens/config.toml)
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Analyse a CSV of exam responses
    Analyze {
        /// CSV file with question, student_id and marks columns
        input: PathBuf,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,

        /// Directory with vectorizer.json and difficulty_model.json
        #[arg(long)]
        model_dir: Option<PathBuf>,

        /// Minimum marks counted as a pass
        #[arg(long)]
        pass_marks: Option<f64>,

        /// Rule used to flag weak questions
        #[arg(long, value_enum)]
        gap_policy: Option<GapPolicyArg>,
    },
    /// Write a synthetic response dataset
    Generate {
        #[arg(long, default_value_t = 100)]
        students: usize,

        #[arg(long, default_value_t = 15)]
        questions: usize,

        #[arg(long, default_value_t = 5)]
        max_marks: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        #[arg(short, long, default_value = "student_responses.csv")]
        output: PathBuf,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum GapPolicyArg {
    /// Average below a share of the best question's average
    Relative,
    /// Low pass rate or low discrimination
    PassRate,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Write the default configuration to the workspace
    Init,
    /// Print the effective configuration
    Show,
}

fn default_level(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Stderr filter: `RUST_LOG` directives when set, otherwise the flag level.
fn stderr_filter(level: &str, env_directives: Option<&str>) -> EnvFilter {
    env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(level))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = stderr_filter(default_level(cli.verbose, cli.quiet), rust_log.as_deref());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("dev", "examlens", "examlens")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "examlens.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace).await
}
