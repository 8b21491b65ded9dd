use std::collections::BTreeMap;

use crate::ir::Edge;

use super::types::{NodeDegrees, RowMap};

/// Source plus destination appearances over all edges. Every node in `rows`
/// starts at zero; self-loops count twice.
pub fn node_degrees(edges: &[Edge], rows: &RowMap) -> NodeDegrees {
    let mut degrees: NodeDegrees = rows.keys().map(|id| (id.clone(), 0)).collect();
    for edge in edges {
        *degrees.entry(edge.source.clone()).or_insert(0) += 1;
        *degrees.entry(edge.destination.clone()).or_insert(0) += 1;
    }
    degrees
}

pub fn row_populations(rows: &RowMap) -> BTreeMap<u32, usize> {
    let mut populations = BTreeMap::new();
    for row in rows.values() {
        *populations.entry(*row).or_insert(0) += 1;
    }
    populations
}

pub fn max_column(populations: &BTreeMap<u32, usize>) -> usize {
    populations.values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Record;

    fn edge(source: &str, destination: &str) -> Edge {
        Edge {
            source: source.to_string(),
            destination: destination.to_string(),
            pivot: 0,
            edge_type: String::new(),
            id: None,
            attrs: Record::new(),
        }
    }

    #[test]
    fn counts_both_endpoints_over_all_edges() {
        let rows: RowMap = [("a", 0), ("b", 1), ("c", 1), ("d", 2)]
            .into_iter()
            .map(|(id, row)| (id.to_string(), row))
            .collect();
        let edges = vec![edge("a", "b"), edge("a", "c"), edge("c", "c")];
        let degrees = node_degrees(&edges, &rows);
        assert_eq!(degrees["a"], 2);
        assert_eq!(degrees["b"], 1);
        assert_eq!(degrees["c"], 3);
        assert_eq!(degrees["d"], 0);
    }

    #[test]
    fn widest_row_sets_max_column() {
        let rows: RowMap = [("a", 0), ("b", 1), ("c", 1), ("d", 1), ("e", 4)]
            .into_iter()
            .map(|(id, row)| (id.to_string(), row))
            .collect();
        let populations = row_populations(&rows);
        assert_eq!(populations.get(&1), Some(&3));
        assert_eq!(populations.get(&4), Some(&1));
        assert_eq!(max_column(&populations), 3);
        assert_eq!(max_column(&BTreeMap::new()), 0);
    }
}
