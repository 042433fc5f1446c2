//! Dependency cycle detection.

use std::collections::{btree_set, BTreeMap, BTreeSet};

static NO_CHILDREN: BTreeSet<usize> = BTreeSet::new();

/// Find cycles in `adjacency` (node to the nodes it requires).
///
/// Runs a depth-first search from every node in ascending order and reports
/// the edge `(node, child)` that closes a cycle, at most one per search root.
/// Nodes proven to reach no cycle are skipped by later searches. Children
/// missing from the map are treated as leaves. The result holds each edge
/// once, in discovery order.
pub fn find_cycles(adjacency: &BTreeMap<usize, BTreeSet<usize>>) -> Vec<(usize, usize)> {
    let mut done = BTreeSet::new();
    let mut cycles = Vec::new();

    for &root in adjacency.keys() {
        if done.contains(&root) {
            continue;
        }
        let mut in_progress = BTreeSet::from([root]);
        let mut stack = vec![(root, children_of(adjacency, root))];

        while let Some((node, children)) = stack.last_mut() {
            let node = *node;
            match children.next().copied() {
                Some(child) if in_progress.contains(&child) => {
                    if !cycles.contains(&(node, child)) {
                        tracing::debug!("cycle closed by edge {node} -> {child}");
                        cycles.push((node, child));
                    }
                    break;
                }
                Some(child) if done.contains(&child) => {}
                Some(child) => {
                    in_progress.insert(child);
                    stack.push((child, children_of(adjacency, child)));
                }
                None => {
                    in_progress.remove(&node);
                    done.insert(node);
                    stack.pop();
                }
            }
        }
    }

    cycles
}

fn children_of(
    adjacency: &BTreeMap<usize, BTreeSet<usize>>,
    node: usize,
) -> btree_set::Iter<'_, usize> {
    adjacency.get(&node).unwrap_or(&NO_CHILDREN).iter()
}
