//! Stacked-bushy layout: each pivot owns a pair of rows (sources, then
//! destinations), rows are ordered by degree, overlong rows are split by node
//! type and line-wrapped, and rows/columns are scaled into coordinates.

mod axes;
mod coords;
mod degree;
mod error;
mod opacity;
mod rows;
mod types;
mod wrap;

pub use axes::generate_axes;
pub use coords::{default_fudge_y, merge_rows_columns_to_xy, row_to_y};
pub use degree::{max_column, node_degrees, row_populations};
pub use error::LayoutError;
pub use opacity::{ConstantOpacity, DegreeOpacity, EdgeOpacityAdvisor};
pub use rows::assign_rows;
pub use types::*;
pub use wrap::{
    best_line_length, fan_out, order_row, ordered_rows, rows_to_columns, split_row_by_type,
    spread_column, wrap_group, wrap_row,
};

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::{FeatureConfig, LayoutConfig};
use crate::ir::{Label, PivotGraph};

pub fn stacked_bushy_layout(
    graph: &PivotGraph,
    config: &LayoutConfig,
    features: &FeatureConfig,
    advisor: &dyn EdgeOpacityAdvisor,
) -> Result<Layout, LayoutError> {
    config.validate()?;
    let matcher = config.expansion_matcher()?;
    if config.pivot_wrapped_line_height > 0.5 {
        warn!(
            height = config.pivot_wrapped_line_height,
            "line-wrapped nodes are over half the line height"
        );
    }

    let fudge_y = config
        .fudge_y
        .unwrap_or_else(|| default_fudge_y(&graph.edges));
    let spacer_y = config.spacer_y.unwrap_or(fudge_y);

    let rows = assign_rows(&graph.labels, &graph.edges, &matcher);
    let degrees = node_degrees(&graph.edges, &rows);
    let populations = row_populations(&rows);
    let max_column = max_column(&populations);
    debug!(
        nodes = rows.len(),
        rows = populations.len(),
        max_column,
        "assigned rows"
    );

    let types = node_types(&graph.labels);
    let slots = rows_to_columns(&rows, &degrees, &types, max_column, config);
    let positions = merge_rows_columns_to_xy(&slots, config.fudge_x, fudge_y, spacer_y);
    let axes = generate_axes(
        slots.values().map(|slot| slot.row),
        fudge_y,
        spacer_y,
        features.axes,
    );
    let edge_opacity = advisor.edge_opacity(&degrees, &graph.edges);

    let nodes: BTreeMap<String, NodePlacement> = slots
        .into_iter()
        .map(|(id, slot)| {
            let (x, y) = positions.get(&id).copied().unwrap_or_default();
            let degree = degrees.get(&id).copied().unwrap_or(0);
            let placement = NodePlacement {
                row: slot.row,
                column: slot.column,
                degree,
                x,
                y,
            };
            (id, placement)
        })
        .collect();
    debug!(nodes = nodes.len(), axes = axes.len(), "stacked bushy layout done");

    Ok(Layout {
        nodes,
        axes,
        edge_opacity,
        max_column,
        fudge_y,
        spacer_y,
    })
}

pub fn node_types(labels: &[Label]) -> NodeTypes {
    labels
        .iter()
        .filter_map(|label| {
            label
                .node_type
                .as_ref()
                .map(|node_type| (label.id.clone(), node_type.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble_pivots;
    use crate::config::ConfigError;
    use crate::ir::{Bindings, PivotResult};
    use serde_json::json;

    fn expansion(source: &str, destination: &str) -> serde_json::Value {
        json!({ "source": source, "destination": destination, "edgeType": "EventID->node" })
    }

    fn layout(graph: &PivotGraph) -> Layout {
        stacked_bushy_layout(
            graph,
            &LayoutConfig::default(),
            &FeatureConfig::default(),
            &DegreeOpacity::default(),
        )
        .unwrap()
    }

    #[test]
    fn two_pivot_chain() {
        let pivots = vec![
            PivotResult::enabled(vec![expansion("a", "b")], Vec::new()),
            PivotResult::enabled(vec![expansion("b", "c")], Vec::new()),
        ];
        let graph = assemble_pivots(&pivots, &Bindings::default(), "chain").unwrap();
        let layout = layout(&graph);

        assert_eq!(layout.nodes["a"].row, 0.0);
        assert_eq!(layout.nodes["b"].row, 1.0);
        assert_eq!(layout.nodes["c"].row, 3.0);
        assert_eq!(layout.max_column, 1);
        assert_eq!(layout.fudge_y, -250.0);

        assert_eq!(layout.nodes["a"].y, 500.0);
        assert_eq!(layout.nodes["b"].y, -250.0);
        assert_eq!(layout.nodes["c"].y, -1250.0);
        assert!(layout.nodes.values().all(|node| node.x == 0.0));

        assert_eq!(
            layout.axes,
            vec![
                Axis {
                    label: "Pivot 1".to_string(),
                    y: 500.0
                },
                Axis {
                    label: "Pivot 2".to_string(),
                    y: -1000.0
                },
            ]
        );
        assert_eq!(layout.edge_opacity.len(), 2);
    }

    #[test]
    fn self_loop_sits_at_column_zero() {
        let pivots = vec![PivotResult::enabled(
            vec![expansion("a", "a")],
            vec![json!({ "node": "a" })],
        )];
        let graph = assemble_pivots(&pivots, &Bindings::default(), "loop").unwrap();
        let layout = layout(&graph);

        let a = layout.nodes["a"];
        assert_eq!(a.row, 0.0);
        assert_eq!(a.column, 0.0);
        assert_eq!(a.degree, 2);
        assert_eq!(a.x, 0.0);
        assert!(a.y.is_finite());
    }

    #[test]
    fn edgeless_graph_places_isolated_nodes() {
        let pivots = vec![
            PivotResult::enabled(Vec::new(), vec![json!({ "node": "a" })]),
            PivotResult::enabled(Vec::new(), vec![json!({ "node": "b" })]),
        ];
        let graph = assemble_pivots(&pivots, &Bindings::default(), "isolated").unwrap();
        assert!(graph.ensure_edges().is_err());
        let layout = layout(&graph);
        assert_eq!(layout.nodes["a"].row, 0.0);
        assert_eq!(layout.nodes["b"].row, 2.0);
        assert!(layout.edge_opacity.is_empty());
    }

    #[test]
    fn axes_follow_feature_flag() {
        let pivots = vec![PivotResult::enabled(vec![expansion("a", "b")], Vec::new())];
        let graph = assemble_pivots(&pivots, &Bindings::default(), "flag").unwrap();
        let features = FeatureConfig { axes: false };
        let layout = stacked_bushy_layout(
            &graph,
            &LayoutConfig::default(),
            &features,
            &ConstantOpacity(1.0),
        )
        .unwrap();
        assert!(layout.axes.is_empty());
        assert_eq!(layout.edge_opacity, vec![1.0]);
    }

    #[test]
    fn invalid_config_is_rejected_before_layout() {
        let graph = PivotGraph::new("bad", Bindings::default());
        let config = LayoutConfig {
            min_line_length: 10,
            max_line_length: 5,
            ..LayoutConfig::default()
        };
        let err = stacked_bushy_layout(
            &graph,
            &config,
            &FeatureConfig::default(),
            &DegreeOpacity::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::Config(ConfigError::LineLengthOrder { min: 10, max: 5 })
        );
    }

    #[test]
    fn explicit_spacing_overrides_defaults() {
        let pivots = vec![PivotResult::enabled(vec![expansion("a", "b")], Vec::new())];
        let graph = assemble_pivots(&pivots, &Bindings::default(), "spacing").unwrap();
        let config = LayoutConfig {
            fudge_y: Some(100.0),
            spacer_y: Some(10.0),
            ..LayoutConfig::default()
        };
        let layout = stacked_bushy_layout(
            &graph,
            &config,
            &FeatureConfig::default(),
            &DegreeOpacity::default(),
        )
        .unwrap();
        assert_eq!(layout.nodes["a"].y, -20.0);
        assert_eq!(layout.nodes["b"].y, 10.0);
    }

    #[test]
    fn applied_layout_decorates_labels() {
        let pivots = vec![PivotResult::enabled(
            vec![expansion("a", "b"), expansion("a", "c")],
            vec![json!({ "node": "a", "type": "event" })],
        )];
        let mut graph = assemble_pivots(&pivots, &Bindings::default(), "apply").unwrap();
        let layout = layout(&graph);
        graph.apply_layout(&layout);

        for label in &graph.labels {
            let placement = layout.nodes[&label.id];
            assert_eq!(label.x, Some(placement.x));
            assert_eq!(label.y, Some(placement.y));
        }
        assert_eq!(graph.axes, layout.axes);
        assert_eq!(graph.edge_opacity.len(), graph.edges.len());

        // b and c share row 1 and degree 1, so id order decides the columns.
        assert_eq!(layout.max_column, 2);
        assert_eq!(layout.nodes["b"].column, 0.0);
        assert!((layout.nodes["c"].column - 1.0).abs() < 1e-9);
    }
}
