use std::collections::BTreeMap;

use tracing::trace;

use crate::config::LayoutConfig;

use super::types::{NodeDegrees, NodeTypes, Row, RowMap, Slot};

/// Slack added to the `count - 1` denominators below. It keeps the last
/// wrapped sub-row strictly inside its base row's band and the last column
/// strictly below `max_column - 1 + SLACK`.
const SLACK: f64 = 0.001;

/// Buckets nodes by row, each bucket ordered by degree (descending) then id.
pub fn ordered_rows(rows: &RowMap, degrees: &NodeDegrees) -> Vec<Row> {
    let mut buckets: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (node, row) in rows {
        buckets.entry(*row).or_default().push(node.clone());
    }
    buckets
        .into_iter()
        .map(|(number, mut nodes)| {
            order_row(&mut nodes, degrees);
            Row { number, nodes }
        })
        .collect()
}

pub fn order_row(nodes: &mut [String], degrees: &NodeDegrees) {
    let degree = |id: &String| degrees.get(id).copied().unwrap_or(0);
    nodes.sort_by(|a, b| degree(b).cmp(&degree(a)).then_with(|| a.cmp(b)));
}

/// Splits an overlong row into per-type groups, largest group first, unless
/// every group would end up shorter than `min_line_length`. Otherwise the
/// row stays one group.
pub fn split_row_by_type(
    row: &Row,
    types: &NodeTypes,
    min_line_length: usize,
    max_line_length: usize,
) -> Vec<Vec<String>> {
    let too_long = row.len() > max_line_length;
    if !too_long {
        return vec![row.nodes.clone()];
    }

    let mut groups: Vec<(Option<&str>, Vec<String>)> = Vec::new();
    for node in &row.nodes {
        let node_type = types.get(node).map(String::as_str);
        match groups.iter_mut().find(|(key, _)| *key == node_type) {
            Some((_, members)) => members.push(node.clone()),
            None => groups.push((node_type, vec![node.clone()])),
        }
    }
    groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    let now_too_short = groups
        .iter()
        .all(|(_, members)| members.len() < min_line_length);
    if now_too_short {
        trace!(row = row.number, groups = groups.len(), "type split too fine, keeping row whole");
        return vec![row.nodes.clone()];
    }
    trace!(row = row.number, groups = groups.len(), "splitting row by type");
    groups.into_iter().map(|(_, members)| members).collect()
}

/// Picks the line length in `[max/2, 2*max)` that leaves the fullest last
/// line. The earliest candidate wins ties. The result may exceed
/// `max_line_length`.
pub fn best_line_length(len: usize, max_line_length: usize) -> f64 {
    let start = max_line_length as f64 / 2.0;
    let end = max_line_length as f64 * 2.0;
    if len == 0 {
        return start;
    }

    let last = (len - 1) as f64;
    let mut best = start;
    let mut best_fill = f64::NEG_INFINITY;
    let mut candidate = start;
    while candidate < end {
        let fill = (1.0 + last % candidate) / candidate;
        if fill > best_fill {
            best = candidate;
            best_fill = fill;
        }
        candidate += 1.0;
    }
    best
}

/// Cuts a group into consecutive lines; node `i` lands on line
/// `trunc(i / line_length)`.
pub fn wrap_group(group: &[String], line_length: f64) -> Vec<Vec<String>> {
    let mut lines: Vec<Vec<String>> = Vec::new();
    let mut current_line = None;
    for (idx, node) in group.iter().enumerate() {
        let line = (idx as f64 / line_length).trunc() as usize;
        if current_line != Some(line) {
            lines.push(Vec::new());
            current_line = Some(line);
        }
        if let Some(members) = lines.last_mut() {
            members.push(node.clone());
        }
    }
    lines
}

/// Type-split then line-wrap one row. Chunks partition the row's nodes.
pub fn wrap_row(
    row: &Row,
    types: &NodeTypes,
    min_line_length: usize,
    max_line_length: usize,
) -> Vec<Vec<String>> {
    split_row_by_type(row, types, min_line_length, max_line_length)
        .iter()
        .flat_map(|group| wrap_group(group, best_line_length(group.len(), max_line_length)))
        .collect()
}

/// Fraction of the wrapped line height given to chunk `index` of `count`.
/// The first chunk stays on the base row; a lone chunk never moves.
pub fn fan_out(index: usize, count: usize) -> f64 {
    if count <= 1 {
        return 0.0;
    }
    index as f64 / (count as f64 - 1.0 + SLACK)
}

/// Column of position `idx` in a chunk of `len` nodes, spread over the
/// shared `max_column` scale. Singleton chunks sit at column 0.
pub fn spread_column(idx: usize, len: usize, max_column: usize) -> f64 {
    if len <= 1 || max_column <= 1 {
        return 0.0;
    }
    idx as f64 * (max_column as f64 - 1.0 + SLACK) / (len as f64 - 1.0 + SLACK)
}

pub fn rows_to_columns(
    rows: &RowMap,
    degrees: &NodeDegrees,
    types: &NodeTypes,
    max_column: usize,
    config: &LayoutConfig,
) -> BTreeMap<String, Slot> {
    let mut slots = BTreeMap::new();
    for row in ordered_rows(rows, degrees) {
        let chunks = wrap_row(
            &row,
            types,
            config.min_line_length,
            config.max_line_length,
        );
        let count = chunks.len();
        if count > 1 {
            trace!(row = row.number, nodes = row.len(), chunks = count, "wrapped row");
        }
        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let sub_row = f64::from(row.number)
                + fan_out(chunk_index, count) * config.pivot_wrapped_line_height;
            for (idx, node) in chunk.iter().enumerate() {
                slots.insert(
                    node.clone(),
                    Slot {
                        row: sub_row,
                        column: spread_column(idx, chunk.len(), max_column),
                    },
                );
            }
        }
    }
    slots
}
