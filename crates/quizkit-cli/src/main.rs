//! quizkit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizkit", version, about = "Adaptive quiz engine toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate question bank TOML files
    Validate {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// List banks with question counts per difficulty
    List {
        /// Path to a bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Run a synthetic adaptive practice session against a bank
    Simulate {
        /// Path to a bank file
        #[arg(long)]
        bank: PathBuf,

        /// RNG seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Number of questions to answer
        #[arg(long, default_value = "20")]
        questions: usize,

        /// Probability the synthetic student answers correctly
        #[arg(long, default_value = "0.7")]
        accuracy: f64,

        /// Shuffle question content before the session
        #[arg(long)]
        shuffle: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the session report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create starter config and example bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::List { bank } => commands::list::execute(bank),
        Commands::Simulate {
            bank,
            seed,
            questions,
            accuracy,
            shuffle,
            config,
            output,
        } => commands::simulate::execute(bank, seed, questions, accuracy, shuffle, config, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
