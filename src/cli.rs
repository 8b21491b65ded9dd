use crate::config::load_config;
use crate::ir::{Bindings, PivotResult};
use crate::layout_dump::{DatasetDump, write_dataset};
use crate::layout_investigation;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use serde::Deserialize;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(
    name = "pivotl",
    version,
    about = "Stacked-bushy layout for pivot investigations"
)]
pub struct Args {
    /// Investigation JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file for the laid-out dataset. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Config file (JSON5) with layout, features, bindings and opacity sections
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Dataset name. Defaults to PivotApp/<input file stem>.
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Do not emit pivot axes
    #[arg(long = "no-axes")]
    pub no_axes: bool,

    /// Lower bound for edge opacity
    #[arg(long = "min-opacity")]
    pub min_opacity: Option<f64>,

    /// Pretty-print the output JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Either a full investigation or a bare list of pivots.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InvestigationInput {
    Full {
        #[serde(default)]
        bindings: Option<Bindings>,
        pivots: Vec<PivotResult>,
    },
    Pivots(Vec<PivotResult>),
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if args.no_axes {
        config.features.axes = false;
    }
    if let Some(min_opacity) = args.min_opacity {
        config.opacity.min_opacity = min_opacity;
    }

    let (input, stem) = read_input(args.input.as_deref())?;
    let (bindings, pivots) = parse_investigation(&input)?;
    let bindings = bindings.unwrap_or_else(|| config.bindings.clone());
    let name = args.name.unwrap_or_else(|| format!("PivotApp/{stem}"));

    let graph = layout_investigation(&pivots, &bindings, &config, &name)?;
    info!(
        name = %graph.name,
        labels = graph.labels.len(),
        edges = graph.edges.len(),
        axes = graph.axes.len(),
        "laid out investigation"
    );

    write_dataset(
        &DatasetDump::from_graph(&graph),
        args.output.as_deref(),
        args.pretty,
    )
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(path: Option<&Path>) -> Result<(String, String)> {
    if let Some(path) = path {
        if path != Path::new("-") {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("investigation")
                .to_string();
            return Ok((content, stem));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, "stdin".to_string()))
}

fn parse_investigation(input: &str) -> Result<(Option<Bindings>, Vec<PivotResult>)> {
    let parsed: InvestigationInput =
        serde_json::from_str(input).context("input is not an investigation or pivot list")?;
    Ok(match parsed {
        InvestigationInput::Full { bindings, pivots } => (bindings, pivots),
        InvestigationInput::Pivots(pivots) => (None, pivots),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_investigation() {
        let input = r#"{
            "bindings": { "idField": "id" },
            "pivots": [
                { "enabled": true, "results": { "graph": [], "labels": [{ "id": "a" }] } },
                { "enabled": false }
            ]
        }"#;
        let (bindings, pivots) = parse_investigation(input).unwrap();
        assert_eq!(bindings.unwrap().id_field, "id");
        assert_eq!(pivots.len(), 2);
        assert!(pivots[0].enabled);
        assert!(pivots[1].results.is_none());
    }

    #[test]
    fn parses_bare_pivot_list() {
        let input = r#"[{ "enabled": true, "results": { "graph": [{ "source": "a", "destination": "b" }] } }]"#;
        let (bindings, pivots) = parse_investigation(input).unwrap();
        assert!(bindings.is_none());
        assert_eq!(pivots[0].results.as_ref().unwrap().graph.len(), 1);
    }

    #[test]
    fn rejects_unrelated_json() {
        assert!(parse_investigation(r#"{ "nodes": [] }"#).is_err());
    }

    #[test]
    fn verbose_flag_counts() {
        let args = Args::parse_from(["pivotl", "-vv", "--no-axes", "-i", "pivots.json"]);
        assert_eq!(args.verbose, 2);
        assert!(args.no_axes);
        assert_eq!(args.input.as_deref(), Some(Path::new("pivots.json")));
    }
}
