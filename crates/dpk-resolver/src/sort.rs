//! Install ordering: a single topological order, or batches of packages that
//! can be installed together.

use std::collections::BTreeSet;

use miette::Diagnostic;
use thiserror::Error;

use crate::cycle::find_cycles;
use crate::graph::PackageGraph;

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum SortError {
    #[error("Cyclic dependencies: {}", format_cycles(.cycles))]
    #[diagnostic(help("Use leveled ordering to break dependency cycles"))]
    CyclicDependency { cycles: Vec<(usize, usize)> },
}

fn format_cycles(cycles: &[(usize, usize)]) -> String {
    cycles
        .iter()
        .map(|(from, to)| format!("{from} -> {to}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOptions {
    /// Produce levels and break cycles instead of failing on them.
    pub break_cycles: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self { break_cycles: true }
    }
}

/// Result of [`sort`]. Package ids appear exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOrder {
    Linear(Vec<usize>),
    Leveled(Vec<Vec<usize>>),
}

pub fn sort(graph: &PackageGraph, options: SortOptions) -> Result<InstallOrder, SortError> {
    if options.break_cycles {
        Ok(InstallOrder::Leveled(leveled(graph)))
    } else {
        linear(graph).map(InstallOrder::Linear)
    }
}

/// Topological order with every package after the packages it requires.
///
/// Fails with every cycle edge the detector finds if the graph is not acyclic.
pub fn linear(graph: &PackageGraph) -> Result<Vec<usize>, SortError> {
    match petgraph::algo::toposort(graph.inner(), None) {
        Ok(order) => Ok(order.into_iter().rev().map(|n| n.index()).collect()),
        Err(cycle) => {
            tracing::debug!(
                "linear sort hit a cycle at package {}",
                cycle.node_id().index()
            );
            Err(SortError::CyclicDependency {
                cycles: find_cycles(&graph.adjacency()),
            })
        }
    }
}

/// Batches of packages whose requirements are all in earlier batches.
///
/// When no package is free, every package on a detected cycle edge is
/// forced into the current batch. Each batch is in ascending id order.
pub fn leveled(graph: &PackageGraph) -> Vec<Vec<usize>> {
    let mut remaining = graph.adjacency();
    let mut levels = Vec::new();

    while !remaining.is_empty() {
        let mut level: BTreeSet<usize> = remaining
            .iter()
            .filter(|(_, children)| children.is_empty())
            .map(|(&id, _)| id)
            .collect();

        if level.is_empty() {
            let cycles = find_cycles(&remaining);
            tracing::debug!(
                "breaking {} cycle(s) at level {}",
                cycles.len(),
                levels.len()
            );
            for (from, to) in cycles {
                level.insert(from);
                level.insert(to);
            }
        }

        for id in &level {
            remaining.remove(id);
        }
        for children in remaining.values_mut() {
            children.retain(|child| !level.contains(child));
        }
        levels.push(level.into_iter().collect());
    }

    levels
}
