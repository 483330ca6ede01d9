// Exploration tree: arena of visited configurations

use gold_core::Input;
use hashbrown::HashSet;

use super::Branch;
use crate::path::{Path, PathStep};

/// Index of a node in the [`ExplorationTree`] arena.
pub(crate) type NodeId = usize;

/// The starting configuration.
pub(crate) const ROOT: NodeId = 0;

#[derive(Debug)]
struct Node<B> {
    branch: B,
    /// Tape position: symbols before it have been consumed.
    offset: usize,
    via: Option<Input>,
    parent: Option<NodeId>,
}

/// Append-only tree of the configurations a query has reached.
///
/// Lives for a single query. Nodes are only ever appended, so a `NodeId`
/// stays valid for the lifetime of the tree.
#[derive(Debug)]
pub(crate) struct ExplorationTree<B> {
    nodes: Vec<Node<B>>,
    /// Configurations already in the tree, when deduplicating.
    seen: Option<HashSet<(B, usize)>>,
}

impl<B: Branch> ExplorationTree<B> {
    /// Tree holding only the starting configuration, as [`ROOT`].
    pub(crate) fn new(root: B, deduplicate: bool) -> Self {
        let seen = deduplicate.then(|| {
            let mut seen = HashSet::new();
            seen.insert((root.clone(), 0));
            seen
        });
        Self {
            nodes: vec![Node {
                branch: root,
                offset: 0,
                via: None,
                parent: None,
            }],
            seen,
        }
    }

    /// Append a configuration reached from `parent` by `via`.
    ///
    /// Returns `None` if deduplication is on and the configuration is
    /// already in the tree.
    pub(crate) fn insert(
        &mut self,
        branch: B,
        offset: usize,
        via: Input,
        parent: NodeId,
    ) -> Option<NodeId> {
        if let Some(seen) = &mut self.seen {
            if !seen.insert((branch.clone(), offset)) {
                return None;
            }
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            branch,
            offset,
            via: Some(via),
            parent: Some(parent),
        });
        Some(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Walk from `node` up to the root and return the run root-first.
    pub(crate) fn path(&self, node: NodeId, tape: &[char]) -> Path {
        let mut steps = Vec::new();
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            steps.push(PathStep {
                state: node.branch.state().clone(),
                remaining: tape[node.offset..].iter().collect(),
                via: node.via,
                stack: node.branch.stack().cloned(),
            });
            cursor = node.parent;
        }
        steps.reverse();
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gold_core::State;

    #[test]
    fn path_runs_root_first() {
        let tape = ['a', 'b'];
        let mut tree = ExplorationTree::new(State::from(0), true);
        let one = tree.insert(State::from(1), 1, Input::Symbol('a'), ROOT).unwrap();
        let two = tree.insert(State::from(2), 1, Input::Epsilon, one).unwrap();
        let three = tree.insert(State::from(3), 2, Input::Symbol('b'), two).unwrap();

        let path = tree.path(three, &tape);
        let states: Vec<String> = path.iter().map(|s| s.state.to_string()).collect();
        assert_eq!(states, vec!["0", "1", "2", "3"]);
        assert_eq!(path[0].remaining, "ab");
        assert_eq!(path[0].via, None);
        assert_eq!(path[2].via, Some(Input::Epsilon));
        assert_eq!(path[3].remaining, "");
        assert!(path[3].stack.is_none());
    }

    #[test]
    fn deduplication_rejects_seen_configurations() {
        let mut tree = ExplorationTree::new(State::from(0), true);
        assert!(tree.insert(State::from(0), 0, Input::Epsilon, ROOT).is_none());
        assert!(tree.insert(State::from(0), 1, Input::Symbol('a'), ROOT).is_some());
        assert!(tree.insert(State::from(0), 1, Input::Epsilon, 1).is_none());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn without_deduplication_everything_is_kept() {
        let mut tree = ExplorationTree::new(State::from(0), false);
        assert!(tree.insert(State::from(0), 0, Input::Epsilon, 0).is_some());
        assert!(tree.insert(State::from(0), 0, Input::Epsilon, 1).is_some());
        assert_eq!(tree.len(), 3);
    }
}
