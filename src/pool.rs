//! Population-wide fitness evaluation across a pool of workers.
//!
//! Every worker owns a private scorer. The coordinator hands out one
//! [`Request`] at a time per worker and refills a worker as soon as its
//! [`Reply`] comes back, so faster workers take on more of the generation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │   Population (single-threaded driver)    │
//! ├──────────────────────────────────────────┤
//! │   WorkerPool::evaluate_all (barrier)     │
//! │   shared cursor + CompletionTracker      │
//! ├─────────────┬─────────────┬──────────────┤
//! │  worker 0   │  worker 1   │  worker N-1  │
//! │ Interpreter │ Interpreter │ Interpreter  │
//! └─────────────┴─────────────┴──────────────┘
//! ```
//!
//! Requests and replies are copied across channels; nothing is shared.

mod dispatch;
mod worker;

pub use dispatch::{CompletionTracker, WorkerPool};

use crate::error::PoolError;
use crate::vm::{FitnessResult, Interpreter};
use serde::{Deserialize, Serialize};

/// One genome sent out for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Slot of the genome in the population. Replies are matched by this,
    /// never by arrival order.
    pub index: usize,
    /// Instruction bytes to run.
    pub genes: Vec<u8>,
}

impl Request {
    /// Attach a score to this request.
    #[must_use]
    pub fn into_reply(self, fitness: FitnessResult) -> Reply {
        Reply {
            index: self.index,
            genes: self.genes,
            fitness,
        }
    }
}

/// A request echoed back with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Slot of the genome in the population.
    pub index: usize,
    /// Instruction bytes that were run.
    pub genes: Vec<u8>,
    /// Score of the run.
    pub fitness: FitnessResult,
}

/// Scores a single program. Implemented by whatever a worker owns.
pub trait Evaluate {
    /// Run `genes` and score the result.
    fn evaluate(&mut self, genes: &[u8]) -> FitnessResult;
}

impl Evaluate for Interpreter {
    fn evaluate(&mut self, genes: &[u8]) -> FitnessResult {
        Interpreter::evaluate(self, genes)
    }
}

/// Scores a whole generation, returning results in program order.
pub trait FitnessService {
    /// Score every program. Returns only once all results are in.
    ///
    /// # Errors
    ///
    /// Returns an error if evaluation cannot complete.
    fn evaluate_all(&mut self, programs: &[&[u8]]) -> Result<Vec<FitnessResult>, PoolError>;
}

/// In-process scoring on the calling thread.
impl FitnessService for Interpreter {
    fn evaluate_all(&mut self, programs: &[&[u8]]) -> Result<Vec<FitnessResult>, PoolError> {
        Ok(programs
            .iter()
            .map(|genes| Interpreter::evaluate(self, genes))
            .collect())
    }
}
