use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Integer row per node, before line-wrapping.
pub type RowMap = BTreeMap<String, u32>;
pub type NodeDegrees = BTreeMap<String, usize>;
/// Node id to type; untyped nodes are absent.
pub type NodeTypes = BTreeMap<String, String>;

/// One row bucket: the nodes sharing an integer row, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub number: u32,
    pub nodes: Vec<String>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Row/column position after wrapping. `row` may be fractional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub row: f64,
    pub column: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePlacement {
    pub row: f64,
    pub column: f64,
    pub degree: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub nodes: BTreeMap<String, NodePlacement>,
    pub axes: Vec<Axis>,
    /// One value per edge of the laid-out graph, in edge order.
    pub edge_opacity: Vec<f64>,
    /// Largest row population; shared column normalization.
    pub max_column: usize,
    pub fudge_y: f64,
    pub spacer_y: f64,
}
