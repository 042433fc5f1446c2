//! Non-fatal findings collected while building a package graph.

use std::fmt;

use dpk_core::requirement::Requirement;
use dpk_core::version::VersionError;

use crate::graph::EdgeKind;

/// Everything graph construction skipped or flagged.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub unresolved: Vec<UnresolvedRequirement>,
    pub conflicts: Vec<ConflictDiagnostic>,
}

/// Why a requirement produced no edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No package provides a matching capability.
    NoProvider,
    /// A candidate's version or the requirement's version could not be compared.
    InvalidVersion(VersionError),
}

/// A dependency or install-if requirement no package satisfies.
#[derive(Debug, Clone)]
pub struct UnresolvedRequirement {
    pub package: usize,
    /// `name-version` of the requiring package.
    pub package_label: String,
    pub kind: EdgeKind,
    pub requirement: Requirement,
    pub reason: UnresolvedReason,
}

/// A conflict (`!name`) requirement that some package in the index satisfies.
#[derive(Debug, Clone)]
pub struct ConflictDiagnostic {
    pub package: usize,
    pub package_label: String,
    pub requirement: Requirement,
    pub provider: usize,
    pub provider_label: String,
}

impl BuildReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unresolved(&mut self, unresolved: UnresolvedRequirement) {
        self.unresolved.push(unresolved);
    }

    pub fn add_conflict(&mut self, conflict: ConflictDiagnostic) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.unresolved.is_empty() && self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.unresolved.len() + self.conflicts.len()
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProvider => write!(f, "no provider"),
            Self::InvalidVersion(e) => write!(f, "{e}"),
        }
    }
}

impl fmt::Display for UnresolvedRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} unresolved ({})",
            self.package_label, self.kind, self.requirement, self.reason
        )
    }
}

impl fmt::Display for ConflictDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: conflicts with {} (provided by {})",
            self.package_label, self.requirement, self.provider_label
        )
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "All requirements resolved.");
        }
        if !self.unresolved.is_empty() {
            writeln!(f, "Unresolved requirements ({}):", self.unresolved.len())?;
            for u in &self.unresolved {
                writeln!(f, "  {u}")?;
            }
        }
        if !self.conflicts.is_empty() {
            writeln!(f, "Conflicts present in index ({}):", self.conflicts.len())?;
            for c in &self.conflicts {
                writeln!(f, "  {c}")?;
            }
        }
        Ok(())
    }
}
