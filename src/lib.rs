// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tapegen: genetic search for tape-machine programs.
//!
//! Candidate programs are fixed-length strings over an eight-symbol
//! alphabet (`> < + - . , [ ]`). Each is run on a small circular tape and
//! scored by how far its output is from a goal string. A population of
//! candidates is bred until one prints the goal exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │    gp: Population / Genome          │
//! ├─────────────────────────────────────┤
//! │    pool: WorkerPool (threads)       │
//! ├─────────────────────────────────────┤
//! │    vm: Interpreter / Tape           │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod gp;
pub mod pool;
pub mod vm;

pub use error::{ConfigError, EvolutionError, PoolError};

// Re-export key types at crate root for convenience
pub use gp::{EvolutionConfig, Genome, Population, Rates, Winner};
pub use pool::{FitnessService, WorkerPool};
pub use vm::{FitnessResult, Interpreter, InterpreterConfig};
