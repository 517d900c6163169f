//! Directed graph queries over connection keys.

use crate::{ConnectionKey, NodeKey};

use ahash::RandomState;

use std::collections::HashSet;

pub type NodeSet = HashSet<NodeKey, RandomState>;

/// Returns whether adding `test` to `connections` would create
/// a cycle. Self-connections always do.
///
/// # Examples
/// ```
/// use neatgen::genomics::graphs::creates_cycle;
///
/// let connections = [(-1, 2), (2, 0)];
/// assert!(creates_cycle(&connections, (0, 2)));
/// assert!(creates_cycle(&connections, (2, 2)));
/// assert!(!creates_cycle(&connections, (-1, 0)));
/// ```
pub fn creates_cycle(connections: &[ConnectionKey], test: ConnectionKey) -> bool {
    let (input, output) = test;
    if input == output {
        return true;
    }

    let mut visited = NodeSet::default();
    visited.insert(output);
    loop {
        let mut added = 0;
        for &(a, b) in connections {
            if visited.contains(&a) && !visited.contains(&b) {
                if b == input {
                    return true;
                }
                visited.insert(b);
                added += 1;
            }
        }
        if added == 0 {
            return false;
        }
    }
}

/// Returns the outputs plus every non-input node from which
/// an output can be reached through `connections`.
pub fn required_for_output(
    inputs: &[NodeKey],
    outputs: &[NodeKey],
    connections: &[ConnectionKey],
) -> NodeSet {
    let mut required: NodeSet = outputs.iter().copied().collect();
    let mut frontier = required.clone();
    loop {
        let layer: NodeSet = connections
            .iter()
            .filter(|(a, b)| frontier.contains(b) && !frontier.contains(a))
            .map(|&(a, _)| a)
            .collect();
        if layer.is_empty() {
            break;
        }
        let hidden: Vec<NodeKey> = layer
            .iter()
            .copied()
            .filter(|k| !inputs.contains(k))
            .collect();
        if hidden.is_empty() {
            break;
        }
        required.extend(hidden);
        frontier.extend(layer);
    }
    required
}

/// Returns `sources` plus every node reachable
/// from them through `connections`.
pub fn reachable_from(sources: &[NodeKey], connections: &[ConnectionKey]) -> NodeSet {
    let mut reached: NodeSet = sources.iter().copied().collect();
    let mut frontier: Vec<NodeKey> = sources.to_vec();
    while let Some(node) = frontier.pop() {
        for &(a, b) in connections {
            if a == node && reached.insert(b) {
                frontier.push(b);
            }
        }
    }
    reached
}
