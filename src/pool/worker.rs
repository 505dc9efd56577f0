//! Worker thread body and the events it reports.

use crate::pool::{Evaluate, Reply, Request};
use crossbeam_channel::{Receiver, Sender};

/// What a worker tells the coordinator.
#[derive(Debug)]
pub(crate) enum WorkerEvent {
    /// The worker is running and waiting for requests.
    Ready { worker: usize },
    /// A request has been scored.
    Reply { worker: usize, reply: Reply },
    /// The worker stopped, either because its request channel closed or
    /// because it panicked.
    Exited { worker: usize, panicked: bool },
}

/// Reports the worker's exit however the thread ends, unwinding included.
#[derive(Debug)]
struct ExitGuard {
    worker: usize,
    events: Sender<WorkerEvent>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let _ = self.events.send(WorkerEvent::Exited {
            worker: self.worker,
            panicked: std::thread::panicking(),
        });
    }
}

/// Serve requests until the coordinator hangs up.
///
/// Each request is scored to completion before the next is taken.
pub(crate) fn run_worker<E: Evaluate>(
    worker: usize,
    mut evaluator: E,
    requests: &Receiver<Request>,
    events: &Sender<WorkerEvent>,
) {
    let _guard = ExitGuard {
        worker,
        events: events.clone(),
    };

    if events.send(WorkerEvent::Ready { worker }).is_err() {
        return;
    }

    for request in requests {
        let fitness = evaluator.evaluate(&request.genes);
        let reply = request.into_reply(fitness);
        if events.send(WorkerEvent::Reply { worker, reply }).is_err() {
            break;
        }
    }
}
