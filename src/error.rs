//! Error types for configuration, the worker pool and the evolution loop.
//!
//! Interpreter anomalies (unmatched brackets, exhausted budgets) are never
//! errors: they are folded into the fitness score. Everything here is either
//! a rejected configuration or a fatal pool failure.

use thiserror::Error;

/// A configuration value that cannot produce a working search.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The goal string has no bytes to match.
    #[error("goal must not be empty")]
    EmptyGoal,
    /// The tape has no cells.
    #[error("tape size must be at least 1")]
    ZeroTapeSize,
    /// Genomes must carry at least one gene.
    #[error("genome length must be at least 1")]
    ZeroGenomeLength,
    /// Mating needs two distinct survivors.
    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),
    /// Snapshots are taken every N generations, N must be positive.
    #[error("report interval must be at least 1")]
    ZeroReportInterval,
    /// A worker count of zero leaves nobody to evaluate genomes.
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// A rate outside the closed unit interval (or NaN).
    #[error("rate `{name}` must lie in [0, 1], got {value}")]
    RateOutOfRange {
        /// Name of the offending rate.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Reading a config file failed.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// A config file did not parse.
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of the worker pool. All of them are fatal to a run.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool was asked to start with no workers.
    #[error("worker pool needs at least one worker")]
    NoWorkers,
    /// The operating system refused to start a worker thread.
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
    /// A worker went away. There is no respawn and no rerouting.
    #[error("worker {worker} exited")]
    WorkerExited {
        /// Index of the lost worker.
        worker: usize,
    },
    /// A worker unwound from a panic while scoring.
    #[error("worker {worker} exited after a panic")]
    WorkerPanicked {
        /// Index of the lost worker.
        worker: usize,
    },
    /// Every worker dropped its end of the event channel.
    #[error("worker event channel disconnected")]
    Disconnected,
    /// A reply named an index that is unknown or already answered.
    #[error("unexpected reply for genome {index}")]
    UnexpectedReply {
        /// Index carried by the reply.
        index: usize,
    },
}

/// Failure of an evolution run.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// The configuration was rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Fitness evaluation failed.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
