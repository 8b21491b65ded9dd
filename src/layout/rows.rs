use tracing::trace;

use crate::config::ExpansionMatcher;
use crate::ir::{Edge, Label};

use super::types::RowMap;

/// Places every node on the lowest row any expansion edge puts it on:
/// `2 * pivot` as a source, `2 * pivot + 1` as a destination. Nodes no
/// expansion edge touches sit on `2 * pivot` of their own label.
pub fn assign_rows(labels: &[Label], edges: &[Edge], matcher: &ExpansionMatcher) -> RowMap {
    let mut rows = RowMap::new();
    let mut qualifying = 0usize;
    for edge in edges.iter().filter(|edge| matcher.matches(&edge.edge_type)) {
        qualifying += 1;
        let source_row = edge.pivot.saturating_mul(2);
        observe(&mut rows, &edge.source, source_row);
        observe(&mut rows, &edge.destination, source_row.saturating_add(1));
    }

    let mut isolated = 0usize;
    for label in labels {
        rows.entry(label.id.clone()).or_insert_with(|| {
            isolated += 1;
            label.pivot.saturating_mul(2)
        });
    }
    trace!(qualifying, isolated, "assigned rows");
    rows
}

fn observe(rows: &mut RowMap, node: &str, row: u32) {
    rows.entry(node.to_string())
        .and_modify(|current| *current = (*current).min(row))
        .or_insert(row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::Record;

    fn edge(source: &str, destination: &str, pivot: u32, edge_type: &str) -> Edge {
        Edge {
            source: source.to_string(),
            destination: destination.to_string(),
            pivot,
            edge_type: edge_type.to_string(),
            id: None,
            attrs: Record::new(),
        }
    }

    fn matcher() -> ExpansionMatcher {
        LayoutConfig::default().expansion_matcher().unwrap()
    }

    #[test]
    fn keeps_lowest_observed_row() {
        let labels = vec![
            Label::placeholder("a", 0),
            Label::placeholder("b", 0),
            Label::placeholder("c", 1),
        ];
        let edges = vec![
            edge("a", "b", 0, "EventID->b"),
            edge("b", "c", 1, "EventID->c"),
        ];
        let rows = assign_rows(&labels, &edges, &matcher());
        assert_eq!(rows.get("a"), Some(&0));
        assert_eq!(rows.get("b"), Some(&1));
        assert_eq!(rows.get("c"), Some(&3));
    }

    #[test]
    fn isolated_nodes_use_their_own_pivot() {
        let labels = vec![Label::placeholder("lonely", 3)];
        let rows = assign_rows(&labels, &[], &matcher());
        assert_eq!(rows.get("lonely"), Some(&6));
    }

    #[test]
    fn non_expansion_edges_do_not_place_nodes() {
        let labels = vec![Label::placeholder("a", 2), Label::placeholder("b", 2)];
        let edges = vec![edge("a", "b", 0, "related"), edge("a", "b", 0, "")];
        let rows = assign_rows(&labels, &edges, &matcher());
        assert_eq!(rows.get("a"), Some(&4));
        assert_eq!(rows.get("b"), Some(&4));
    }

    #[test]
    fn unlabeled_endpoints_still_get_rows() {
        let edges = vec![edge("a", "b", 1, "EventID->b")];
        let rows = assign_rows(&[], &edges, &matcher());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get("b"), Some(&3));
    }
}
