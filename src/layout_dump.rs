use crate::ir::{Bindings, PivotGraph, Record};
use crate::layout::Axis;
use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// The laid-out dataset as handed to the visualization upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDump {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub bindings: Bindings,
    pub graph: Vec<Record>,
    pub labels: Vec<Record>,
    pub axes: Vec<Axis>,
    pub edge_opacity: Vec<f64>,
}

impl DatasetDump {
    pub fn from_graph(graph: &PivotGraph) -> Self {
        let graph_records = graph
            .edges
            .iter()
            .map(|edge| edge.to_record(&graph.bindings))
            .collect();
        let labels = graph
            .labels
            .iter()
            .map(|label| label.to_record(&graph.bindings))
            .collect();

        DatasetDump {
            name: graph.name.clone(),
            kind: graph.kind.clone(),
            bindings: graph.bindings.clone(),
            graph: graph_records,
            labels,
            axes: graph.axes.clone(),
            edge_opacity: graph.edge_opacity.clone(),
        }
    }
}

/// Writes the dataset as JSON to `output`, or stdout when no path is given.
pub fn write_dataset(dump: &DatasetDump, output: Option<&Path>, pretty: bool) -> Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_json(&mut writer, dump, pretty)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_json(&mut writer, dump, pretty)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_json<W: Write>(writer: &mut W, dump: &DatasetDump, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, dump)?;
    } else {
        serde_json::to_writer(writer, dump)?;
    }
    Ok(())
}
