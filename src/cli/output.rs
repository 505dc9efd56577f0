//! Output formatting utilities for CLI.

use serde::Serialize;
use tapegen::{FitnessResult, Winner};

/// JSON-serializable winner.
#[derive(Debug, Serialize)]
pub(super) struct JsonWinner {
    /// Generation in which the winner was found.
    pub(super) generation: u64,
    /// Program text.
    pub(super) program: String,
    /// Distance from the goal (always 0).
    pub(super) distance: u64,
    /// Steps the program took.
    pub(super) ops_used: u32,
}

impl JsonWinner {
    /// Create from a Winner.
    pub(super) fn from_winner(winner: &Winner) -> Self {
        Self {
            generation: winner.generation,
            program: winner.program(),
            distance: winner.fitness.distance,
            ops_used: winner.fitness.ops_used,
        }
    }
}

/// JSON-serializable single-program run.
#[derive(Debug, Serialize)]
pub(super) struct JsonRun {
    /// Program text that was run.
    pub(super) program: String,
    /// Goal string.
    pub(super) goal: String,
    /// Output, lossily decoded.
    pub(super) output: String,
    /// Distance from the goal.
    pub(super) distance: u64,
    /// Steps consumed.
    pub(super) ops_used: u32,
}

/// Format a winner as human-readable text.
pub(super) fn format_winner(winner: &Winner, elapsed_seconds: f64) -> String {
    let mut output = String::new();
    output.push_str(&format!("Winner found in generation {}\n", winner.generation));
    output.push_str(&format!("  Program: {}\n", winner.program()));
    output.push_str(&format!("  Distance: {}\n", winner.fitness.distance));
    output.push_str(&format!("  Ops used: {}\n", winner.fitness.ops_used));
    output.push_str(&format!("  Elapsed time: {elapsed_seconds:.1}s\n"));
    output
}

/// Format a single run as human-readable text.
pub(super) fn format_run(program: &str, output_text: &str, fitness: FitnessResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("Program: {program}\n"));
    output.push_str(&format!("  Output: {output_text:?}\n"));
    output.push_str(&format!("  Distance: {}\n", fitness.distance));
    output.push_str(&format!("  Ops used: {}\n", fitness.ops_used));
    if fitness.is_exact() {
        output.push_str("  Exact match\n");
    }
    output
}
