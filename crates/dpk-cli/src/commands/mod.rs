//! Command dispatch and handler modules.

mod graph;
mod info;
mod repos;
mod search;
mod version;

use std::path::{Path, PathBuf};

use miette::Result;

use dpk_core::config::DpkConfig;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Graph { linear, output } => {
            let config = load_config(cli.config.as_deref())?;
            let paths = dpk_ops::ops_load::index_sources(&config, &cli.indexes)?;
            graph::exec(&config, &paths, linear, output).await
        }
        Command::Search {
            patterns,
            exact,
            regex,
            name_only,
            ignore_case,
        } => {
            let paths = index_paths(cli.config.as_deref(), &cli.indexes)?;
            search::exec(&paths, &patterns, exact, regex, name_only, ignore_case).await
        }
        Command::Info { names, json } => {
            let paths = index_paths(cli.config.as_deref(), &cli.indexes)?;
            info::exec(&paths, &names, json).await
        }
        Command::Repos => repos::exec(&load_config(cli.config.as_deref())?),
        Command::Version { action } => version::exec(action),
    }
}

fn load_config(path: Option<&Path>) -> Result<DpkConfig> {
    match path {
        Some(path) => DpkConfig::load_from(path),
        None => DpkConfig::load(),
    }
}

/// Explicit `--index` files, skipping config loading when any are given.
fn index_paths(config: Option<&Path>, explicit: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    let paths = dpk_ops::ops_load::index_sources(&load_config(config)?, explicit)?;
    tracing::debug!("using {} configured index file(s)", paths.len());
    Ok(paths)
}
