//! Handler for `dpk search`.

use std::path::PathBuf;

use miette::Result;

use dpk_ops::matcher::MatchMode;
use dpk_ops::ops_search::{self, SearchOptions};

pub async fn exec(
    paths: &[PathBuf],
    patterns: &[String],
    exact: bool,
    regex: bool,
    name_only: bool,
    ignore_case: bool,
) -> Result<()> {
    let mode = if exact {
        MatchMode::Exact
    } else if regex {
        MatchMode::Regex
    } else {
        MatchMode::Glob
    };
    let opts = SearchOptions {
        mode,
        name_only,
        ignore_case,
    };
    ops_search::search(paths, patterns, &opts).await
}
