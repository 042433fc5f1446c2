//! CLI argument definitions for dpk.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dpk",
    version,
    about = "Dependency resolution for APK package indexes",
    long_about = "dpk reads extracted APKINDEX files, resolves every package's dependencies \
                  and install-if conditions against the index, and computes an install order."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read this extracted index instead of the configured repositories (repeatable)
    #[arg(long = "index", value_name = "FILE", global = true)]
    pub indexes: Vec<PathBuf>,

    /// Use this config file instead of ~/.dpk/config.toml
    #[arg(long, value_name = "PATH", global = true, env = "DPK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the dependency graph and print an install order
    Graph {
        /// Print one flat order and fail on dependency cycles
        #[arg(long)]
        linear: bool,
        /// Write packages.txt, shallowIsolates.txt, deepIsolates.txt and sorted.txt here
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Search for packages with a pattern matching name and description
    #[command(alias = "s", group(ArgGroup::new("mode").args(["exact", "regex"])))]
    Search {
        /// Patterns to look for (glob by default)
        #[arg(required = true)]
        patterns: Vec<String>,
        /// Match whole names exactly
        #[arg(long)]
        exact: bool,
        /// Treat patterns as regular expressions
        #[arg(long)]
        regex: bool,
        /// Only match package names
        #[arg(long)]
        name_only: bool,
        /// Ignore case when matching
        #[arg(short, long)]
        ignore_case: bool,
    },

    /// Show information about a package
    #[command(alias = "show")]
    Info {
        /// One or more package names
        #[arg(required = true)]
        names: Vec<String>,
        /// Print JSON instead of info blocks
        #[arg(long)]
        json: bool,
    },

    /// List configured repositories and their local index files
    Repos,

    /// Compare, validate and match version strings
    Version {
        #[command(subcommand)]
        action: VersionAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum VersionAction {
    /// Compare two versions
    Compare {
        a: String,
        b: String,
        /// Treat the second version as a prefix
        #[arg(long)]
        fuzzy: bool,
    },
    /// Check that versions are well formed
    Validate {
        #[arg(required = true)]
        versions: Vec<String>,
    },
    /// Check a version against a requirement such as `pkg>=1.2`
    Satisfies {
        version: String,
        requirement: String,
    },
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}
