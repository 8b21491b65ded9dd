use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, trace};

use crate::ir::{
    Bindings, EDGE_TYPE_FIELD, Edge, Label, PIVOT_FIELD, PivotGraph, PivotResult, Record,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Label,
    Edge,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Label => f.write_str("label"),
            RecordKind::Edge => f.write_str("edge"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("pivot {pivot}: {kind} record {index} is not a JSON object")]
    NotAnObject {
        pivot: u32,
        kind: RecordKind,
        index: usize,
    },
    #[error("pivot {pivot}: {kind} record {index} is missing field `{field}`")]
    MissingField {
        pivot: u32,
        kind: RecordKind,
        index: usize,
        field: String,
    },
}

/// Merges enabled pivots into one graph. Labels and edges seen in an earlier
/// pivot keep their pivot tag; edge endpoints without a label record get a
/// placeholder label.
pub fn assemble_pivots(
    pivots: &[PivotResult],
    bindings: &Bindings,
    name: &str,
) -> Result<PivotGraph, AssembleError> {
    let mut graph = PivotGraph::new(name, bindings.clone());
    let mut label_ids: HashSet<String> = HashSet::new();
    let mut edge_ids: HashSet<String> = HashSet::new();

    for (index, pivot) in pivots.iter().enumerate() {
        let pivot_index = u32::try_from(index).unwrap_or(u32::MAX);
        let results = match (&pivot.results, pivot.enabled) {
            (Some(results), true) => results,
            _ => {
                trace!(pivot = pivot_index, "skipping disabled pivot");
                continue;
            }
        };

        for (record_index, value) in results.labels.iter().enumerate() {
            let label = parse_label(value, bindings, pivot_index, record_index)?;
            if label_ids.insert(label.id.clone()) {
                graph.labels.push(label);
            }
        }

        for (record_index, value) in results.graph.iter().enumerate() {
            let edge = parse_edge(value, bindings, pivot_index, record_index)?;
            if let Some(id) = &edge.id {
                if !edge_ids.insert(id.clone()) {
                    continue;
                }
            }
            graph.edges.push(edge);
        }
    }

    sort_edges_by_pivot_and_id(&mut graph.edges);
    let missing = synthesize_missing_nodes(&graph.edges, &graph.labels);
    debug!(
        labels = graph.labels.len(),
        edges = graph.edges.len(),
        placeholders = missing.len(),
        "assembled pivot graph"
    );
    graph.labels.extend(missing);
    sort_labels_by_pivot_and_id(&mut graph.labels);

    Ok(graph)
}

/// Placeholder labels for edge endpoints that no pivot described. Each takes
/// the pivot of the first edge mentioning it.
pub fn synthesize_missing_nodes(edges: &[Edge], labels: &[Label]) -> Vec<Label> {
    let known: HashSet<&str> = labels.iter().map(|label| label.id.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut missing = Vec::new();
    for edge in edges {
        for endpoint in [edge.source.as_str(), edge.destination.as_str()] {
            if known.contains(endpoint) || !seen.insert(endpoint) {
                continue;
            }
            missing.push(Label::placeholder(endpoint, edge.pivot));
        }
    }
    missing
}

pub fn sort_labels_by_pivot_and_id(labels: &mut [Label]) {
    labels.sort_by(|a, b| a.pivot.cmp(&b.pivot).then_with(|| a.id.cmp(&b.id)));
}

pub fn sort_edges_by_pivot_and_id(edges: &mut [Edge]) {
    edges.sort_by(|a, b| {
        a.pivot
            .cmp(&b.pivot)
            .then_with(|| a.id.as_deref().unwrap_or("").cmp(b.id.as_deref().unwrap_or("")))
    });
}

fn parse_label(
    value: &Value,
    bindings: &Bindings,
    pivot: u32,
    index: usize,
) -> Result<Label, AssembleError> {
    let record = as_record(value, pivot, RecordKind::Label, index)?;
    let id = required_scalar(record, &bindings.id_field, pivot, RecordKind::Label, index)?;
    let mut attrs = record.clone();
    attrs.remove(&bindings.id_field);
    let node_type = attrs.remove(&bindings.type_field).and_then(|v| scalar_text(&v));
    let pivot = attrs
        .remove(PIVOT_FIELD)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(pivot);
    let x = attrs.remove("x").and_then(|v| v.as_f64());
    let y = attrs.remove("y").and_then(|v| v.as_f64());
    Ok(Label {
        id,
        pivot,
        node_type,
        x,
        y,
        attrs,
    })
}

fn parse_edge(
    value: &Value,
    bindings: &Bindings,
    pivot: u32,
    index: usize,
) -> Result<Edge, AssembleError> {
    let record = as_record(value, pivot, RecordKind::Edge, index)?;
    let source = required_scalar(record, &bindings.source_field, pivot, RecordKind::Edge, index)?;
    let destination = required_scalar(
        record,
        &bindings.destination_field,
        pivot,
        RecordKind::Edge,
        index,
    )?;
    let mut attrs = record.clone();
    attrs.remove(&bindings.source_field);
    attrs.remove(&bindings.destination_field);
    let id = attrs
        .remove(&bindings.edge_id_field)
        .and_then(|v| scalar_text(&v));
    let edge_type = attrs
        .remove(EDGE_TYPE_FIELD)
        .and_then(|v| scalar_text(&v))
        .unwrap_or_default();
    let pivot = attrs
        .remove(PIVOT_FIELD)
        .and_then(|v| v.as_u64())
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(pivot);
    Ok(Edge {
        source,
        destination,
        pivot,
        edge_type,
        id,
        attrs,
    })
}

fn as_record(
    value: &Value,
    pivot: u32,
    kind: RecordKind,
    index: usize,
) -> Result<&Record, AssembleError> {
    value
        .as_object()
        .ok_or(AssembleError::NotAnObject { pivot, kind, index })
}

fn required_scalar(
    record: &Record,
    field: &str,
    pivot: u32,
    kind: RecordKind,
    index: usize,
) -> Result<String, AssembleError> {
    record
        .get(field)
        .and_then(scalar_text)
        .ok_or_else(|| AssembleError::MissingField {
            pivot,
            kind,
            index,
            field: field.to_string(),
        })
}

/// Ids and types may arrive as numbers or booleans; they are compared as text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
