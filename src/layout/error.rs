use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Raised by [`crate::ir::PivotGraph::ensure_edges`], never by the layout itself.
    #[error("graph has no edges to lay out")]
    EmptyGraph,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
