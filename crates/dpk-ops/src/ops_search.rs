//! Operation: search packages by name and description.

use std::path::PathBuf;

use dpk_core::index::PackageIndex;
use dpk_core::package::Package;

use crate::matcher::{MatchMode, Matcher};

/// Options for `dpk search`.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub mode: MatchMode,
    /// Only match package names, not descriptions.
    pub name_only: bool,
    pub ignore_case: bool,
}

/// Packages whose name, or description unless `name_only`, matches.
pub fn find<'a>(index: &'a PackageIndex, matcher: &Matcher, name_only: bool) -> Vec<&'a Package> {
    index
        .packages
        .iter()
        .filter(|p| matcher.is_match(&p.name) || (!name_only && matcher.is_match(&p.description)))
        .collect()
}

/// Print every package matching any of `patterns`.
pub async fn search(
    paths: &[PathBuf],
    patterns: &[String],
    opts: &SearchOptions,
) -> miette::Result<()> {
    let matcher = Matcher::new(patterns, opts.mode, opts.ignore_case)?;
    let index = crate::ops_load::load_indexes(paths).await?;

    let found = find(&index, &matcher, opts.name_only);
    tracing::debug!("{} of {} package(s) matched", found.len(), index.len());
    for package in found {
        println!("{}", package.short_description());
    }
    Ok(())
}
