//! Operation: build the package graph and compute an install order.

use std::path::{Path, PathBuf};

use dpk_core::index::PackageIndex;
use dpk_resolver::graph::PackageGraph;
use dpk_resolver::provider::ProviderIndex;
use dpk_resolver::sort::{self, InstallOrder, SortOptions};
use dpk_util::errors::DpkError;

/// Options for `dpk graph`.
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Emit one flat order and fail on cycles.
    pub linear: bool,
    /// Break cycles into shared levels. Ignored with `linear`.
    pub break_cycles: bool,
    /// Directory to write the result files into.
    pub output: Option<PathBuf>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            linear: false,
            break_cycles: true,
            output: None,
        }
    }
}

impl GraphOptions {
    fn sort_options(&self) -> SortOptions {
        SortOptions {
            break_cycles: self.break_cycles && !self.linear,
        }
    }
}

/// A built graph together with the computed install order.
#[derive(Debug, Clone)]
pub struct GraphAnalysis {
    pub graph: PackageGraph,
    pub order: InstallOrder,
}

impl GraphAnalysis {
    /// Install order as a flat list, levels concatenated.
    pub fn flat_order(&self) -> Vec<usize> {
        match &self.order {
            InstallOrder::Linear(order) => order.clone(),
            InstallOrder::Leveled(levels) => levels.iter().flatten().copied().collect(),
        }
    }
}

/// Build the graph of `index` and sort it.
pub fn analyze(index: &PackageIndex, opts: &GraphOptions) -> miette::Result<GraphAnalysis> {
    let providers = ProviderIndex::new(index);
    tracing::debug!("{} provided name(s)", providers.len());
    let graph = PackageGraph::build(index, &providers);
    let order = sort::sort(&graph, opts.sort_options())?;
    Ok(GraphAnalysis { graph, order })
}

/// Build, sort and report on the graph of the given index files.
pub async fn graph(paths: &[PathBuf], opts: &GraphOptions) -> miette::Result<()> {
    let index = crate::ops_load::load_indexes(paths).await?;
    dpk_util::progress::status("Loaded", &format!("{} package(s)", index.len()));

    let analysis = analyze(&index, opts)?;
    let graph = &analysis.graph;
    dpk_util::progress::status(
        "Resolved",
        &format!("{} package(s), {} edge(s)", graph.len(), graph.edge_count()),
    );

    let report = graph.report();
    for unresolved in &report.unresolved {
        dpk_util::progress::status_warn("Unresolved", &unresolved.to_string());
    }
    for conflict in &report.conflicts {
        dpk_util::progress::status_info("Conflict", &conflict.to_string());
    }

    let shallow = graph.shallow_isolates();
    let deep = graph.deep_isolates();
    dpk_util::progress::status_info(
        "Isolates",
        &format!("{} shallow, {} deep", shallow.len(), deep.len()),
    );

    match &analysis.order {
        InstallOrder::Linear(order) => {
            for &id in order {
                println!("{}", index.packages[id].name_description());
            }
        }
        InstallOrder::Leveled(levels) => {
            for (level, ids) in levels.iter().enumerate() {
                let names: Vec<_> = ids.iter().map(|&id| label(&index, id)).collect();
                println!("{level}: {}", names.join(" "));
            }
        }
    }

    if let Some(dir) = &opts.output {
        write_outputs(&index, &analysis, dir)?;
        dpk_util::progress::status("Wrote", &format!("graph files to {}", dir.display()));
    }
    Ok(())
}

/// Write `packages.txt`, `shallowIsolates.txt`, `deepIsolates.txt` and
/// `sorted.txt` into `dir`.
pub fn write_outputs(
    index: &PackageIndex,
    analysis: &GraphAnalysis,
    dir: &Path,
) -> miette::Result<()> {
    dpk_util::fs::ensure_dir(dir).map_err(DpkError::Io)?;
    let describe = |ids: Vec<usize>| -> Vec<String> {
        ids.into_iter()
            .map(|id| index.packages[id].name_description())
            .collect()
    };

    std::fs::write(dir.join("packages.txt"), index.to_string()).map_err(DpkError::Io)?;
    dpk_util::fs::write_lines(
        &dir.join("shallowIsolates.txt"),
        describe(analysis.graph.shallow_isolates()),
    )
    .map_err(DpkError::Io)?;
    dpk_util::fs::write_lines(
        &dir.join("deepIsolates.txt"),
        describe(analysis.graph.deep_isolates()),
    )
    .map_err(DpkError::Io)?;
    dpk_util::fs::write_lines(&dir.join("sorted.txt"), describe(analysis.flat_order()))
        .map_err(DpkError::Io)?;
    Ok(())
}

fn label(index: &PackageIndex, id: usize) -> String {
    let package = &index.packages[id];
    format!("{}-{}", package.name, package.version)
}
