//! Package dependency graph construction and traversal.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use dpk_core::index::PackageIndex;
use dpk_core::package::Package;
use dpk_core::requirement::Requirement;

use crate::provider::ProviderIndex;
use crate::report::{BuildReport, ConflictDiagnostic, UnresolvedReason, UnresolvedRequirement};

/// Which list of the parent package an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Dependency,
    InstallIf,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependency => write!(f, "dependency"),
            Self::InstallIf => write!(f, "install-if"),
        }
    }
}

/// Edge label: the resolved child and the requirement that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildRef {
    pub package: usize,
    pub kind: EdgeKind,
    pub requirement: Requirement,
}

/// Reverse view of a [`ChildRef`]: the package that requires this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef<'a> {
    pub package: usize,
    pub edge: &'a ChildRef,
}

/// Directed graph over an index, one node per package.
///
/// Node `i` is the package at position `i` of the index the graph was built
/// from; edges point from a package to what it requires.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    graph: DiGraph<usize, ChildRef>,
    report: BuildReport,
}

impl PackageGraph {
    /// Resolve every dependency and install-if requirement of every package.
    ///
    /// Unresolvable requirements are left out and recorded in the
    /// [`BuildReport`]. A conflict that resolves becomes an edge tagged with
    /// its inverted requirement and is also reported; one that does not
    /// resolve is skipped.
    pub fn build(index: &PackageIndex, providers: &ProviderIndex) -> Self {
        let mut graph = DiGraph::with_capacity(index.len(), 0);
        for id in 0..index.len() {
            graph.add_node(id);
        }
        let mut report = BuildReport::new();

        for (id, package) in index.packages.iter().enumerate() {
            let requirements = package
                .dependencies
                .iter()
                .map(|r| (EdgeKind::Dependency, r))
                .chain(package.install_if.iter().map(|r| (EdgeKind::InstallIf, r)));

            for (kind, requirement) in requirements {
                let resolved = providers.resolve(index, requirement);
                let reason = match resolved {
                    Ok(Some(child)) if child == id => {
                        tracing::debug!("dropping self edge on {}", label(package));
                        continue;
                    }
                    Ok(Some(child)) => {
                        if requirement.is_conflict() {
                            tracing::debug!("{} conflicts with {}", label(package), requirement);
                            report.add_conflict(ConflictDiagnostic {
                                package: id,
                                package_label: label(package),
                                requirement: requirement.clone(),
                                provider: child,
                                provider_label: label(&index.packages[child]),
                            });
                        }
                        graph.add_edge(
                            NodeIndex::new(id),
                            NodeIndex::new(child),
                            ChildRef {
                                package: child,
                                kind,
                                requirement: requirement.clone(),
                            },
                        );
                        continue;
                    }
                    // A missing conflicting package is not a problem.
                    _ if requirement.is_conflict() => continue,
                    Ok(None) => UnresolvedReason::NoProvider,
                    Err(e) => UnresolvedReason::InvalidVersion(e),
                };
                tracing::debug!(
                    "{}: {} {} unresolved ({})",
                    label(package),
                    kind,
                    requirement,
                    reason
                );
                report.add_unresolved(UnresolvedRequirement {
                    package: id,
                    package_label: label(package),
                    kind,
                    requirement: requirement.clone(),
                    reason,
                });
            }
        }

        tracing::debug!(
            "built package graph: {} node(s), {} edge(s), {} finding(s)",
            graph.node_count(),
            graph.edge_count(),
            report.len()
        );
        Self { graph, report }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// The underlying petgraph graph. Node weights are package ids.
    pub fn inner(&self) -> &DiGraph<usize, ChildRef> {
        &self.graph
    }

    /// Outgoing edges of `id`, in the order the requirements are declared.
    pub fn children(&self, id: usize) -> Vec<&ChildRef> {
        let mut children: Vec<_> = self
            .graph
            .edges_directed(NodeIndex::new(id), Direction::Outgoing)
            .map(|e| e.weight())
            .collect();
        // petgraph yields the most recently added edge first.
        children.reverse();
        children
    }

    /// Packages that require `id`.
    pub fn parents(&self, id: usize) -> Vec<ParentRef<'_>> {
        let mut parents: Vec<_> = self
            .graph
            .edges_directed(NodeIndex::new(id), Direction::Incoming)
            .map(|e| ParentRef {
                package: e.source().index(),
                edge: e.weight(),
            })
            .collect();
        parents.sort_by_key(|p| p.package);
        parents
    }

    /// Packages nothing else requires.
    pub fn shallow_isolates(&self) -> Vec<usize> {
        self.ids_without(Direction::Incoming)
    }

    /// Packages that require nothing.
    pub fn deep_isolates(&self) -> Vec<usize> {
        self.ids_without(Direction::Outgoing)
    }

    fn ids_without(&self, direction: Direction) -> Vec<usize> {
        self.graph
            .node_indices()
            .filter(|&n| self.graph.neighbors_directed(n, direction).next().is_none())
            .map(NodeIndex::index)
            .collect()
    }

    /// Each package mapped to the distinct set of packages it requires.
    pub fn adjacency(&self) -> BTreeMap<usize, BTreeSet<usize>> {
        self.graph
            .node_indices()
            .map(|n| {
                let children: BTreeSet<usize> =
                    self.graph.neighbors(n).map(NodeIndex::index).collect();
                (n.index(), children)
            })
            .collect()
    }
}

fn label(package: &Package) -> String {
    format!("{}-{}", package.name, package.version)
}
