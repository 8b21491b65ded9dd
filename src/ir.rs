use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::layout::{Axis, Layout, LayoutError};

/// Field every assembled record is tagged with to remember its pivot step.
pub const PIVOT_FIELD: &str = "Pivot";
/// Field holding an edge's relationship tag, e.g. `EventID->user`.
pub const EDGE_TYPE_FIELD: &str = "edgeType";

pub const DATASET_KIND: &str = "edgelist";

/// A raw JSON record as delivered by a pivot.
pub type Record = Map<String, Value>;

/// Names of the record fields the layout reads structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bindings {
    pub source_field: String,
    pub destination_field: String,
    pub id_field: String,
    pub type_field: String,
    #[serde(alias = "idEdgeField")]
    pub edge_id_field: String,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            source_field: "source".to_string(),
            destination_field: "destination".to_string(),
            id_field: "node".to_string(),
            type_field: "type".to_string(),
            edge_id_field: "edge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotResults {
    #[serde(default)]
    pub graph: Vec<Value>,
    #[serde(default)]
    pub labels: Vec<Value>,
}

/// One investigation step. Disabled pivots keep their slot so later pivot
/// indices stay positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub results: Option<PivotResults>,
}

impl PivotResult {
    pub fn enabled(graph: Vec<Value>, labels: Vec<Value>) -> Self {
        Self {
            enabled: true,
            results: Some(PivotResults { graph, labels }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub id: String,
    pub pivot: u32,
    pub node_type: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Everything else the record carried, passed through untouched.
    pub attrs: Record,
}

impl Label {
    pub fn placeholder(id: impl Into<String>, pivot: u32) -> Self {
        Self {
            id: id.into(),
            pivot,
            node_type: None,
            x: None,
            y: None,
            attrs: Record::new(),
        }
    }

    pub fn to_record(&self, bindings: &Bindings) -> Record {
        let mut record = self.attrs.clone();
        record.insert(bindings.id_field.clone(), Value::from(self.id.clone()));
        record.insert(PIVOT_FIELD.to_string(), Value::from(self.pivot));
        if let Some(node_type) = &self.node_type {
            record.insert(bindings.type_field.clone(), Value::from(node_type.clone()));
        }
        if let Some(x) = self.x {
            record.insert("x".to_string(), Value::from(x));
        }
        if let Some(y) = self.y {
            record.insert("y".to_string(), Value::from(y));
        }
        record
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: String,
    pub destination: String,
    pub pivot: u32,
    pub edge_type: String,
    pub id: Option<String>,
    pub attrs: Record,
}

impl Edge {
    pub fn to_record(&self, bindings: &Bindings) -> Record {
        let mut record = self.attrs.clone();
        record.insert(
            bindings.source_field.clone(),
            Value::from(self.source.clone()),
        );
        record.insert(
            bindings.destination_field.clone(),
            Value::from(self.destination.clone()),
        );
        record.insert(PIVOT_FIELD.to_string(), Value::from(self.pivot));
        if !self.edge_type.is_empty() {
            record.insert(
                EDGE_TYPE_FIELD.to_string(),
                Value::from(self.edge_type.clone()),
            );
        }
        if let Some(id) = &self.id {
            record.insert(bindings.edge_id_field.clone(), Value::from(id.clone()));
        }
        record
    }
}

/// The unified edge list of an investigation, ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotGraph {
    pub name: String,
    pub kind: String,
    pub bindings: Bindings,
    pub labels: Vec<Label>,
    pub edges: Vec<Edge>,
    pub axes: Vec<Axis>,
    pub edge_opacity: Vec<f64>,
}

impl PivotGraph {
    pub fn new(name: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            name: name.into(),
            kind: DATASET_KIND.to_string(),
            bindings,
            labels: Vec::new(),
            edges: Vec::new(),
            axes: Vec::new(),
            edge_opacity: Vec::new(),
        }
    }

    pub fn label(&self, id: &str) -> Option<&Label> {
        self.labels.iter().find(|label| label.id == id)
    }

    /// Layout of an edgeless graph is well defined but meaningless; callers
    /// check this before laying out.
    pub fn ensure_edges(&self) -> Result<(), LayoutError> {
        if self.edges.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }
        Ok(())
    }

    pub fn apply_layout(&mut self, layout: &Layout) {
        for label in &mut self.labels {
            if let Some(placement) = layout.nodes.get(&label.id) {
                label.x = Some(placement.x);
                label.y = Some(placement.y);
            }
        }
        self.axes = layout.axes.clone();
        self.edge_opacity = layout.edge_opacity.clone();
    }
}
