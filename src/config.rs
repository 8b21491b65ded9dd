use crate::ir::Bindings;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Pixel scale of one column step, and the base of the default row step.
pub const DEFAULT_FUDGE: f64 = 250.0;
pub const DEFAULT_EXPANSION_EDGE_PREFIX: &str = "EventID->";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NonPositiveLineLength { field: &'static str },
    #[error("minLineLength ({min}) exceeds maxLineLength ({max})")]
    LineLengthOrder { min: usize, max: usize },
    #[error("pivotWrappedLineHeight must lie in (0, 1], got {0}")]
    WrappedLineHeight(f64),
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("invalid expansion edge pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub fudge_x: f64,
    /// Row pitch. When unset, derived from the busiest pivot's edge count.
    pub fudge_y: Option<f64>,
    /// Offset between the source and destination rows of a pivot. Defaults
    /// to the resolved `fudge_y`.
    pub spacer_y: Option<f64>,
    pub min_line_length: usize,
    pub max_line_length: usize,
    pub pivot_wrapped_line_height: f64,
    pub expansion_edge_prefix: String,
    /// Anchored regex; takes precedence over the prefix when set.
    pub expansion_edge_pattern: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            fudge_x: DEFAULT_FUDGE,
            fudge_y: None,
            spacer_y: None,
            min_line_length: 5,
            max_line_length: 100,
            pivot_wrapped_line_height: 0.25,
            expansion_edge_prefix: DEFAULT_EXPANSION_EDGE_PREFIX.to_string(),
            expansion_edge_pattern: None,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_line_length == 0 {
            return Err(ConfigError::NonPositiveLineLength {
                field: "minLineLength",
            });
        }
        if self.max_line_length == 0 {
            return Err(ConfigError::NonPositiveLineLength {
                field: "maxLineLength",
            });
        }
        if self.min_line_length > self.max_line_length {
            return Err(ConfigError::LineLengthOrder {
                min: self.min_line_length,
                max: self.max_line_length,
            });
        }
        let height = self.pivot_wrapped_line_height;
        if !(height > 0.0 && height <= 1.0) {
            return Err(ConfigError::WrappedLineHeight(height));
        }
        let spacings = [
            ("fudgeX", Some(self.fudge_x)),
            ("fudgeY", self.fudge_y),
            ("spacerY", self.spacer_y),
        ];
        for (field, value) in spacings {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite { field, value });
                }
            }
        }
        Ok(())
    }

    pub fn expansion_matcher(&self) -> Result<ExpansionMatcher, ConfigError> {
        match &self.expansion_edge_pattern {
            Some(pattern) => Regex::new(&format!("^(?:{pattern})"))
                .map(ExpansionMatcher::Pattern)
                .map_err(|err| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: err.to_string(),
                }),
            None => Ok(ExpansionMatcher::Prefix(self.expansion_edge_prefix.clone())),
        }
    }
}

/// Decides which edges express a pivot expansion and therefore place their
/// endpoints into rows.
#[derive(Debug, Clone)]
pub enum ExpansionMatcher {
    Prefix(String),
    Pattern(Regex),
}

impl ExpansionMatcher {
    /// Untyped edges never qualify.
    pub fn matches(&self, edge_type: &str) -> bool {
        if edge_type.is_empty() {
            return false;
        }
        match self {
            ExpansionMatcher::Prefix(prefix) => edge_type.starts_with(prefix.as_str()),
            ExpansionMatcher::Pattern(regex) => regex.is_match(edge_type),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeatureConfig {
    pub axes: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self { axes: true }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpacityConfig {
    pub min_opacity: f64,
}

impl Default for OpacityConfig {
    fn default() -> Self {
        Self { min_opacity: 0.1 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub layout: LayoutConfig,
    pub features: FeatureConfig,
    pub bindings: Bindings,
    pub opacity: OpacityConfig,
}

/// Reads a JSON5 config file; missing sections and fields keep their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    let config: Config = json5::from_str(&contents)?;
    config.layout.validate()?;
    Ok(config)
}
