use pivot_layout::{Bindings, Config, DatasetDump, PivotResult, layout_investigation};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Investigation {
    name: Option<String>,
    bindings: Option<Bindings>,
    pivots: Vec<PivotResult>,
}

fn parse_config(config_json: Option<String>) -> Result<Config, String> {
    match config_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| error.to_string()),
        None => Ok(Config::default()),
    }
}

fn layout_to_json(investigation_json: &str, config: &Config) -> Result<String, String> {
    let investigation: Investigation =
        serde_json::from_str(investigation_json).map_err(|error| error.to_string())?;
    let bindings = investigation
        .bindings
        .unwrap_or_else(|| config.bindings.clone());
    let name = investigation
        .name
        .unwrap_or_else(|| "PivotApp/browser".to_string());
    let graph = layout_investigation(&investigation.pivots, &bindings, config, &name)
        .map_err(|error| format!("{error:#}"))?;
    serde_json::to_string(&DatasetDump::from_graph(&graph)).map_err(|error| error.to_string())
}

/// Lays out `{name?, bindings?, pivots}` and returns the dataset JSON.
#[wasm_bindgen]
pub fn stacked_bushy_layout_json(
    investigation_json: &str,
    config_json: Option<String>,
) -> Result<String, JsValue> {
    let config = parse_config(config_json).map_err(|error| JsValue::from_str(&error))?;
    layout_to_json(investigation_json, &config).map_err(|error| JsValue::from_str(&error))
}
