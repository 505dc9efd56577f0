//! Tapegen CLI - evolve tape-machine programs that print a goal string.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Tapegen - genetic search for tape-machine programs
#[derive(Parser, Debug)]
#[command(name = "tapegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log progress and worker lifecycle (same as RUST_LOG=info)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a program until it prints the goal
    Evolve(cli::evolve::EvolveArgs),

    /// Score a single program against a goal
    Run {
        /// Program text; characters outside `<>+-.,[]` are ignored
        #[arg(required = true)]
        program: String,

        /// Goal string (default: "hello")
        #[arg(short, long)]
        goal: Option<String>,

        /// Tape size in cells (default: 50)
        #[arg(long)]
        tape_size: Option<usize>,

        /// Step budget (default: 10000)
        #[arg(long)]
        max_ops: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let result = match args.command {
        Commands::Evolve(evolve) => cli::evolve::execute(evolve),
        Commands::Run {
            program,
            goal,
            tape_size,
            max_ops,
            format,
        } => cli::run::execute(&program, goal, tape_size, max_ops, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
