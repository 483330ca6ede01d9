// Worker pool driver for the search
//
// The queue and the count of tasks being processed live under one mutex, so
// "queue empty and nothing in flight" is observed atomically: the query is
// exhausted exactly then. The first accepting node goes into a write-once
// slot; workers stop taking tasks as soon as it is filled. Tasks already in
// flight finish, and whatever they enqueue is dropped with the queue.

use std::collections::VecDeque;
use std::panic;
use std::sync::{Condvar, Mutex, OnceLock};
use std::thread;

use gold_core::{DispatchError, Input};
use tracing::trace;

use super::tree::{ExplorationTree, NodeId};
use super::{Branch, Explorer, Processed, Task, lock};
use crate::config::SearchConfig;

struct Scheduler<B> {
    queue: VecDeque<Task<B>>,
    in_flight: usize,
    /// Set when a worker panicked; the others stop so the panic can surface.
    abandoned: bool,
}

struct Shared<'a, B> {
    scheduler: Mutex<Scheduler<B>>,
    ready: Condvar,
    accepted: OnceLock<NodeId>,
    tree: &'a Mutex<ExplorationTree<B>>,
}

/// Marks the scheduler abandoned if its worker unwinds.
struct PanicGuard<'s, 'a, B> {
    shared: &'s Shared<'a, B>,
}

impl<B> Drop for PanicGuard<'_, '_, B> {
    fn drop(&mut self) {
        if thread::panicking() {
            lock(&self.shared.scheduler).abandoned = true;
            self.shared.ready.notify_all();
        }
    }
}

/// Process `seeds` and everything they spawn on `config.workers` threads.
pub(super) fn drain<B, F>(
    explorer: &Explorer<'_, F>,
    tree: &Mutex<ExplorationTree<B>>,
    seeds: Vec<Task<B>>,
    config: &SearchConfig,
) -> Option<NodeId>
where
    B: Branch,
    F: Fn(&B, Input) -> Result<Vec<B>, DispatchError> + Sync,
{
    let shared = Shared {
        scheduler: Mutex::new(Scheduler {
            queue: seeds.into(),
            in_flight: 0,
            abandoned: false,
        }),
        ready: Condvar::new(),
        accepted: OnceLock::new(),
        tree,
    };

    thread::scope(|scope| {
        let handles: Vec<_> = (0..config.workers)
            .map(|worker| {
                let shared = &shared;
                scope.spawn(move || run_worker(worker, explorer, shared, config))
            })
            .collect();
        for handle in handles {
            // Re-raise a handler panic with its own payload.
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
    });

    shared.accepted.into_inner()
}

fn run_worker<B, F>(
    worker: usize,
    explorer: &Explorer<'_, F>,
    shared: &Shared<'_, B>,
    config: &SearchConfig,
) where
    B: Branch,
    F: Fn(&B, Input) -> Result<Vec<B>, DispatchError>,
{
    let _guard = PanicGuard { shared };
    let mut processed = 0usize;

    while let Some(task) = next_task(shared, config) {
        let result = explorer.process(task, shared.tree);
        processed += 1;

        let mut scheduler = lock(&shared.scheduler);
        scheduler.in_flight -= 1;
        match result {
            Processed::Accepted(node) => {
                // First publish wins.
                let _ = shared.accepted.set(node);
            }
            Processed::Spawned(tasks) => scheduler.queue.extend(tasks),
        }
        drop(scheduler);
        shared.ready.notify_all();
    }

    trace!(worker, processed, "worker done");
}

/// Block until a task is available, or return `None` once the query is
/// over: accepted, exhausted or abandoned.
fn next_task<B>(shared: &Shared<'_, B>, config: &SearchConfig) -> Option<Task<B>> {
    let mut scheduler = lock(&shared.scheduler);
    loop {
        if shared.accepted.get().is_some() || scheduler.abandoned {
            return None;
        }
        if let Some(task) = scheduler.queue.pop_front() {
            scheduler.in_flight += 1;
            return Some(task);
        }
        if scheduler.in_flight == 0 {
            shared.ready.notify_all();
            return None;
        }
        scheduler = match shared.ready.wait_timeout(scheduler, config.poll_interval) {
            Ok((guard, _)) => guard,
            Err(poisoned) => poisoned.into_inner().0,
        };
    }
}
