//! Dependency resolution engine: provider selection, package graph
//! construction, cycle detection, and linear or leveled install ordering.
//!
//! Everything here is synchronous and performs no I/O. Packages are
//! identified by their position in a [`dpk_core::index::PackageIndex`].

pub mod cycle;
pub mod graph;
pub mod provider;
pub mod report;
pub mod sort;
