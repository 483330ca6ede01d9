// Nondeterministic search over all transition branches
//
// A query explores configurations (branch payload, tape position). Every
// configuration yields two tasks: consume the next tape symbol, or take an
// epsilon move. A task that finds the tape exhausted is terminal; the first
// accepting terminal ends the query, otherwise the query ends once no task
// is left. The payload is a bare state for NFAs and a (state, stack) pair
// for pushdown automata.

mod pool;
mod tree;

use std::fmt;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use gold_core::{DispatchError, Input, State};
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;
use crate::definition::Definition;
use crate::path::Path;
use crate::stack::AutomatonStack;
use tree::{ExplorationTree, NodeId, ROOT};

/// Per-branch payload carried through the search.
pub trait Branch: Clone + Eq + Hash + Send + Sync + fmt::Debug {
    fn state(&self) -> &State;

    /// Whether this branch accepts once the tape is exhausted.
    fn accepts(&self, definition: &Definition) -> bool;

    fn stack(&self) -> Option<&AutomatonStack> {
        None
    }
}

impl Branch for State {
    fn state(&self) -> &State {
        self
    }

    fn accepts(&self, definition: &Definition) -> bool {
        definition.is_final(self)
    }
}

/// Branch of a pushdown automaton: the state and the branch's own stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushdownBranch {
    pub state: State,
    pub stack: AutomatonStack,
}

impl Branch for PushdownBranch {
    fn state(&self) -> &State {
        &self.state
    }

    /// Final state and empty stack.
    fn accepts(&self, definition: &Definition) -> bool {
        definition.is_final(&self.state) && self.stack.is_empty()
    }

    fn stack(&self) -> Option<&AutomatonStack> {
        Some(&self.stack)
    }
}

/// Result of a search query.
#[derive(Debug, Clone)]
pub(crate) struct Outcome {
    pub(crate) accepted: bool,
    pub(crate) path: Path,
    /// Configurations placed in the exploration tree.
    #[cfg(test)]
    pub(crate) explored: usize,
}

/// Unit of work: try `attempt` from the configuration at `node`.
#[derive(Debug)]
struct Task<B> {
    branch: B,
    offset: usize,
    attempt: Input,
    node: NodeId,
}

/// What processing one task produced.
enum Processed<B> {
    Accepted(NodeId),
    Spawned(Vec<Task<B>>),
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One query's worth of exploration state that is read-only while tasks run.
struct Explorer<'a, F> {
    definition: &'a Definition,
    tape: &'a [char],
    step: F,
}

impl<F> Explorer<'_, F> {
    /// Continue and epsilon tasks out of a freshly reached configuration.
    /// With the tape exhausted both would be the same terminal check, so
    /// only one is produced.
    fn tasks_from<B: Branch>(&self, branch: B, offset: usize, node: NodeId, out: &mut Vec<Task<B>>) {
        match self.tape.get(offset) {
            Some(&symbol) => {
                out.push(Task {
                    branch: branch.clone(),
                    offset,
                    attempt: Input::Symbol(symbol),
                    node,
                });
                out.push(Task {
                    branch,
                    offset,
                    attempt: Input::Epsilon,
                    node,
                });
            }
            None => out.push(Task {
                branch,
                offset,
                attempt: Input::Epsilon,
                node,
            }),
        }
    }

    fn process<B>(&self, task: Task<B>, tree: &Mutex<ExplorationTree<B>>) -> Processed<B>
    where
        B: Branch,
        F: Fn(&B, Input) -> Result<Vec<B>, DispatchError>,
    {
        trace!(state = %task.branch.state(), offset = task.offset, attempt = %task.attempt, "task");

        if task.offset == self.tape.len() {
            return if task.branch.accepts(self.definition) {
                Processed::Accepted(task.node)
            } else {
                Processed::Spawned(Vec::new())
            };
        }

        let successors = match (self.step)(&task.branch, task.attempt) {
            Ok(successors) => successors,
            Err(err) => {
                trace!(state = %task.branch.state(), error = %err, "branch has no transition");
                return Processed::Spawned(Vec::new());
            }
        };

        let offset = match task.attempt {
            Input::Symbol(_) => task.offset + 1,
            Input::Epsilon => task.offset,
        };

        let mut fresh: Vec<B> = Vec::with_capacity(successors.len());
        for next in successors {
            // An epsilon self-loop can only lead back here.
            if task.attempt.is_epsilon() && next.state() == task.branch.state() {
                continue;
            }
            if !self.definition.contains(next.state()) {
                warn!(
                    from = %task.branch.state(),
                    to = %next.state(),
                    attempt = %task.attempt,
                    "transition leaves the declared states, dropping branch"
                );
                continue;
            }
            if !fresh.contains(&next) {
                fresh.push(next);
            }
        }

        let mut tasks = Vec::with_capacity(fresh.len() * 2);
        let mut tree = lock(tree);
        for next in fresh {
            if let Some(node) = tree.insert(next.clone(), offset, task.attempt, task.node) {
                self.tasks_from(next, offset, node, &mut tasks);
            }
        }
        Processed::Spawned(tasks)
    }
}

/// Run an acceptance query from `root` over `tape`.
///
/// `step` produces the successor branches of a branch for one input; a
/// dispatch error there kills the branch. Tape symbols must already have
/// been checked against the alphabet.
pub(crate) fn explore<B, F>(
    definition: &Definition,
    tape: &[char],
    root: B,
    config: &SearchConfig,
    step: F,
) -> Outcome
where
    B: Branch,
    F: Fn(&B, Input) -> Result<Vec<B>, DispatchError> + Sync,
{
    if tape.is_empty() {
        return Outcome {
            accepted: definition.is_final(root.state()),
            path: Path::new(),
            #[cfg(test)]
            explored: 0,
        };
    }

    let explorer = Explorer {
        definition,
        tape,
        step,
    };
    let tree = Mutex::new(ExplorationTree::new(root.clone(), config.deduplicate));
    let mut seeds = Vec::with_capacity(2);
    explorer.tasks_from(root, 0, ROOT, &mut seeds);

    let accepted = if config.is_parallel() {
        pool::drain(&explorer, &tree, seeds, config)
    } else {
        drain_sequential(&explorer, &tree, seeds)
    };

    let tree = tree.into_inner().unwrap_or_else(PoisonError::into_inner);
    let explored = tree.len();
    debug!(
        accepted = accepted.is_some(),
        explored,
        workers = config.workers,
        tape_len = tape.len(),
        "search finished"
    );

    match accepted {
        Some(node) => Outcome {
            accepted: true,
            path: tree.path(node, tape),
            #[cfg(test)]
            explored,
        },
        None => Outcome {
            accepted: false,
            path: Path::new(),
            #[cfg(test)]
            explored,
        },
    }
}

/// Drain the task queue on the calling thread.
fn drain_sequential<B, F>(
    explorer: &Explorer<'_, F>,
    tree: &Mutex<ExplorationTree<B>>,
    seeds: Vec<Task<B>>,
) -> Option<NodeId>
where
    B: Branch,
    F: Fn(&B, Input) -> Result<Vec<B>, DispatchError>,
{
    let mut queue: std::collections::VecDeque<Task<B>> = seeds.into();
    while let Some(task) = queue.pop_front() {
        match explorer.process(task, tree) {
            Processed::Accepted(node) => return Some(node),
            Processed::Spawned(tasks) => queue.extend(tasks),
        }
    }
    None
}
