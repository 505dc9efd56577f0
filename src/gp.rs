//! Genetic search for programs that print the goal.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Population::live (unbounded)      │
//! ├─────────────────────────────────────┤
//! │  Evaluate │ Select │ Mate victims   │
//! ├─────────────────────────────────────┤
//! │   FitnessService (worker pool)      │
//! ├─────────────────────────────────────┤
//! │   Interpreter (one per worker)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use tapegen::gp::{EvolutionConfig, Population};
//! use tapegen::pool::WorkerPool;
//!
//! let config = EvolutionConfig::default();
//! let pool = WorkerPool::with_interpreters(config.worker_count(), &config.interpreter)?;
//! let mut population = Population::new(&config, pool)?;
//! let winner = population.live()?;
//! println!("{}", winner.program());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod genome;
mod population;

pub use config::{EvolutionConfig, Rates};
pub use genome::{GeneGenerator, Genome, UniformOps};
pub use population::{Outcome, Population, Snapshot, Winner, survivor_count};
