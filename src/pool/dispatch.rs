//! Worker pool lifecycle and pull-based dispatch.

use crate::error::{EvolutionError, PoolError};
use crate::pool::worker::{WorkerEvent, run_worker};
use crate::pool::{Evaluate, FitnessService, Request};
use crate::vm::{FitnessResult, Interpreter, InterpreterConfig};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error};
use std::thread::{self, JoinHandle};

/// Tracks which request indices of a generation have been answered.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    /// One slot per request: `None` while pending.
    slots: Vec<Option<FitnessResult>>,
    /// Number of slots still `None`.
    pending: usize,
}

impl CompletionTracker {
    /// Start tracking `count` outstanding requests.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            slots: vec![None; count],
            pending: count,
        }
    }

    /// Record the result for `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::UnexpectedReply`] if `index` is out of range or
    /// was already answered.
    pub fn record(&mut self, index: usize, fitness: FitnessResult) -> Result<(), PoolError> {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_none() => {
                *slot = Some(fitness);
                self.pending -= 1;
                Ok(())
            }
            _ => Err(PoolError::UnexpectedReply { index }),
        }
    }

    /// Number of requests still awaiting a reply.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether every request has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending == 0
    }

    /// Results in index order, or `None` while any are pending.
    #[must_use]
    pub fn into_results(self) -> Option<Vec<FitnessResult>> {
        self.slots.into_iter().collect()
    }
}

/// Channel end and thread of one worker.
#[derive(Debug)]
struct WorkerHandle {
    requests: Sender<Request>,
    thread: JoinHandle<()>,
}

/// First failure seen by a pool. Once set, the pool refuses all work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Exited(usize),
    Panicked(usize),
    UnexpectedReply(usize),
    Disconnected,
}

impl Failure {
    fn of(error: &PoolError) -> Self {
        match *error {
            PoolError::WorkerExited { worker } => Failure::Exited(worker),
            PoolError::WorkerPanicked { worker } => Failure::Panicked(worker),
            PoolError::UnexpectedReply { index } => Failure::UnexpectedReply(index),
            PoolError::NoWorkers | PoolError::Spawn(_) | PoolError::Disconnected => {
                Failure::Disconnected
            }
        }
    }

    fn to_error(self) -> PoolError {
        match self {
            Failure::Exited(worker) => PoolError::WorkerExited { worker },
            Failure::Panicked(worker) => PoolError::WorkerPanicked { worker },
            Failure::UnexpectedReply(index) => PoolError::UnexpectedReply { index },
            Failure::Disconnected => PoolError::Disconnected,
        }
    }
}

/// A fixed set of worker threads, each owning a private evaluator.
///
/// Created once per run. Losing any worker is fatal and permanent: the batch
/// that observes the loss fails, and so does every later batch, since
/// replies to requests still in flight would otherwise leak into it.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
    events: Receiver<WorkerEvent>,
    failed: Option<Failure>,
}

impl WorkerPool {
    /// Start `count` workers, building each evaluator with `factory`.
    ///
    /// Blocks until every worker has reported ready.
    ///
    /// # Errors
    ///
    /// Returns an error if `count` is zero, a thread cannot be spawned, or a
    /// worker exits before reporting ready.
    pub fn spawn<E, F>(count: usize, mut factory: F) -> Result<Self, PoolError>
    where
        E: Evaluate + Send + 'static,
        F: FnMut(usize) -> E,
    {
        if count == 0 {
            return Err(PoolError::NoWorkers);
        }

        let (event_tx, events) = crossbeam_channel::unbounded();
        let mut workers = Vec::with_capacity(count);

        for worker in 0..count {
            let (requests, request_rx) = crossbeam_channel::unbounded();
            let evaluator = factory(worker);
            let event_tx = event_tx.clone();
            let thread = thread::Builder::new()
                .name(format!("tapegen-worker-{worker}"))
                .spawn(move || run_worker(worker, evaluator, &request_rx, &event_tx))?;
            workers.push(WorkerHandle { requests, thread });
        }
        drop(event_tx);

        let pool = Self {
            workers,
            events,
            failed: None,
        };
        pool.await_ready()?;
        Ok(pool)
    }

    /// Start `count` workers, each with its own interpreter.
    ///
    /// # Errors
    ///
    /// Returns an error if the interpreter configuration is invalid or the
    /// pool cannot start.
    pub fn with_interpreters(
        count: usize,
        config: &InterpreterConfig,
    ) -> Result<Self, EvolutionError> {
        let interpreter = Interpreter::new(config)?;
        Ok(Self::spawn(count, |_| interpreter.clone())?)
    }

    /// Number of workers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool has no workers (never true for a spawned pool).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    fn await_ready(&self) -> Result<(), PoolError> {
        let mut ready = vec![false; self.workers.len()];
        let mut remaining = ready.len();

        while remaining > 0 {
            match self.events.recv() {
                Ok(WorkerEvent::Ready { worker }) => {
                    if let Some(flag) = ready.get_mut(worker).filter(|flag| !**flag) {
                        *flag = true;
                        remaining -= 1;
                        debug!("worker {worker} is online");
                    }
                }
                Ok(WorkerEvent::Exited { worker, panicked }) => {
                    return Err(lost_worker(worker, panicked));
                }
                Ok(WorkerEvent::Reply { .. }) => {}
                Err(_) => return Err(PoolError::Disconnected),
            }
        }
        Ok(())
    }

    /// Score every program, pipelining requests across the workers.
    ///
    /// Each worker is primed with one program; whenever a reply arrives the
    /// replying worker gets the next unsent program. Returns once all
    /// replies are in, results ordered by program index.
    ///
    /// # Errors
    ///
    /// Returns an error if any worker exits while the batch is in flight, or
    /// if an earlier batch already failed.
    pub fn evaluate_all(&mut self, programs: &[&[u8]]) -> Result<Vec<FitnessResult>, PoolError> {
        if let Some(failure) = self.failed {
            return Err(failure.to_error());
        }

        let result = self.run_batch(programs);
        if let Err(error) = &result {
            self.failed = Some(Failure::of(error));
        }
        result
    }

    /// Whether an earlier batch failed, leaving the pool unusable.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    fn run_batch(&self, programs: &[&[u8]]) -> Result<Vec<FitnessResult>, PoolError> {
        let mut tracker = CompletionTracker::new(programs.len());
        let mut next = 0usize;

        for worker in 0..self.workers.len() {
            self.dispatch(worker, programs, &mut next)?;
        }

        while !tracker.is_complete() {
            match self.events.recv() {
                Ok(WorkerEvent::Reply { worker, reply }) => {
                    tracker.record(reply.index, reply.fitness)?;
                    self.dispatch(worker, programs, &mut next)?;
                }
                Ok(WorkerEvent::Exited { worker, panicked }) => {
                    return Err(lost_worker(worker, panicked));
                }
                Ok(WorkerEvent::Ready { .. }) => {}
                Err(_) => return Err(PoolError::Disconnected),
            }
        }

        tracker.into_results().ok_or(PoolError::Disconnected)
    }

    /// Send the next unsent program to `worker`, if any remain.
    fn dispatch(&self, worker: usize, programs: &[&[u8]], next: &mut usize) -> Result<(), PoolError> {
        let Some(genes) = programs.get(*next) else {
            return Ok(());
        };
        let request = Request {
            index: *next,
            genes: genes.to_vec(),
        };
        self.workers[worker]
            .requests
            .send(request)
            .map_err(|_| PoolError::WorkerExited { worker })?;
        *next += 1;
        Ok(())
    }
}

impl FitnessService for WorkerPool {
    fn evaluate_all(&mut self, programs: &[&[u8]]) -> Result<Vec<FitnessResult>, PoolError> {
        WorkerPool::evaluate_all(self, programs)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for (worker, handle) in self.workers.drain(..).enumerate() {
            let WorkerHandle { requests, thread } = handle;
            drop(requests);
            if thread.join().is_err() {
                debug!("worker {worker} had panicked");
            }
        }
    }
}

fn lost_worker(worker: usize, panicked: bool) -> PoolError {
    error!("worker {worker} died (panicked: {panicked})");
    if panicked {
        PoolError::WorkerPanicked { worker }
    } else {
        PoolError::WorkerExited { worker }
    }
}
