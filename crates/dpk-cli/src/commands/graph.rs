//! Handler for `dpk graph`.

use std::path::PathBuf;

use miette::Result;

use dpk_core::config::DpkConfig;
use dpk_ops::ops_graph::{self, GraphOptions};

pub async fn exec(
    config: &DpkConfig,
    paths: &[PathBuf],
    linear: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let opts = GraphOptions {
        linear,
        break_cycles: config.resolve.break_cycles,
        output,
    };
    ops_graph::graph(paths, &opts).await
}
