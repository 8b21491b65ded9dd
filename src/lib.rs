pub mod assemble;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

pub use assemble::{AssembleError, assemble_pivots};
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, ConfigError, FeatureConfig, LayoutConfig, OpacityConfig, load_config};
pub use ir::{Bindings, Edge, Label, PivotGraph, PivotResult, PivotResults};
pub use layout::{
    Axis, ConstantOpacity, DegreeOpacity, EdgeOpacityAdvisor, Layout, LayoutError,
    NodePlacement, stacked_bushy_layout,
};
pub use layout_dump::{DatasetDump, write_dataset};

/// Assembles the pivots, rejects an edgeless investigation, lays it out and
/// decorates the labels with coordinates.
pub fn layout_investigation(
    pivots: &[PivotResult],
    bindings: &Bindings,
    config: &Config,
    name: &str,
) -> anyhow::Result<PivotGraph> {
    use anyhow::Context;

    let mut graph = assemble_pivots(pivots, bindings, name)?;
    graph.ensure_edges().context("No edges to lay out")?;
    let advisor = DegreeOpacity::new(config.opacity.min_opacity);
    let layout = stacked_bushy_layout(&graph, &config.layout, &config.features, &advisor)?;
    graph.apply_layout(&layout);
    Ok(graph)
}
