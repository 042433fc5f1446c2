//! Operation: read and merge package indexes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use dpk_core::config::DpkConfig;
use dpk_core::index::PackageIndex;
use dpk_util::errors::DpkError;

/// Maximum number of index files read and parsed at once.
const MAX_CONCURRENT_LOADS: usize = 8;

/// The index files a command should read.
///
/// Explicit paths win; otherwise every configured repository's extracted
/// index under the configured index directory is used.
pub fn index_sources(config: &DpkConfig, explicit: &[PathBuf]) -> miette::Result<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }
    let paths = config.index_paths();
    if paths.is_empty() {
        return Err(DpkError::Config {
            message: "No index files given and no repositories configured. \
                      Pass --index FILE or add repositories and architectures to the config"
                .to_string(),
        }
        .into());
    }
    Ok(paths)
}

/// Read every index file concurrently and merge them in the given order.
pub async fn load_indexes(paths: &[PathBuf]) -> miette::Result<PackageIndex> {
    let pb = dpk_util::progress::spinner(&format!("Loading {} index file(s)...", paths.len()));
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_LOADS));
    let mut join_set = JoinSet::new();

    for (position, path) in paths.iter().enumerate() {
        let path = path.clone();
        let sem = semaphore.clone();
        join_set.spawn(async move {
            let _permit = sem.acquire().await;
            let result = load_index(&path).await;
            (position, result)
        });
    }

    let mut loaded: Vec<Option<PackageIndex>> = vec![None; paths.len()];
    let mut first_error = None;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((position, Ok(index))) => loaded[position] = Some(index),
            Ok((_, Err(e))) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                tracing::warn!("index load task failed: {e}");
                if first_error.is_none() {
                    first_error = Some(
                        DpkError::Generic {
                            message: format!("Index load task failed: {e}"),
                        }
                        .into(),
                    );
                }
            }
        }
    }
    pb.finish_and_clear();

    if let Some(e) = first_error {
        return Err(e);
    }

    let index = PackageIndex::merge(loaded.into_iter().flatten());
    tracing::info!(
        "loaded {} package(s) from {} index file(s)",
        index.len(),
        paths.len()
    );
    Ok(index)
}

async fn load_index(path: &Path) -> miette::Result<PackageIndex> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DpkError::Index {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
    let index = PackageIndex::parse(&text).map_err(|e| DpkError::Index {
        message: format!("Failed to parse {}: {e}", path.display()),
    })?;
    tracing::debug!("{}: {} package(s)", path.display(), index.len());
    Ok(index)
}
