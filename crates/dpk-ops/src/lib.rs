//! High-level operations behind the `dpk` commands.
//!
//! Each `ops_*` module loads what it needs, calls into `dpk-core` and
//! `dpk-resolver`, and prints its results.

pub mod matcher;
pub mod ops_graph;
pub mod ops_info;
pub mod ops_load;
pub mod ops_repos;
pub mod ops_search;
pub mod ops_version;
