use crate::ir::Edge;

use super::types::NodeDegrees;

/// Supplies one opacity per edge, aligned with `edges`.
pub trait EdgeOpacityAdvisor {
    fn edge_opacity(&self, degrees: &NodeDegrees, edges: &[Edge]) -> Vec<f64>;
}

impl<F> EdgeOpacityAdvisor for F
where
    F: Fn(&NodeDegrees, &[Edge]) -> Vec<f64>,
{
    fn edge_opacity(&self, degrees: &NodeDegrees, edges: &[Edge]) -> Vec<f64> {
        self(degrees, edges)
    }
}

/// Fades edges touching busy nodes: `1 / sqrt(degree)` of the busier
/// endpoint, never below `min_opacity`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeOpacity {
    pub min_opacity: f64,
}

impl DegreeOpacity {
    pub fn new(min_opacity: f64) -> Self {
        Self {
            min_opacity: if min_opacity.is_nan() { 0.0 } else { min_opacity.clamp(0.0, 1.0) },
        }
    }
}

impl Default for DegreeOpacity {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl EdgeOpacityAdvisor for DegreeOpacity {
    fn edge_opacity(&self, degrees: &NodeDegrees, edges: &[Edge]) -> Vec<f64> {
        let degree = |id: &str| degrees.get(id).copied().unwrap_or(0);
        edges
            .iter()
            .map(|edge| {
                let busiest = degree(edge.source.as_str())
                    .max(degree(edge.destination.as_str()))
                    .max(1);
                (1.0 / (busiest as f64).sqrt()).max(self.min_opacity).min(1.0)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantOpacity(pub f64);

impl EdgeOpacityAdvisor for ConstantOpacity {
    fn edge_opacity(&self, _degrees: &NodeDegrees, edges: &[Edge]) -> Vec<f64> {
        vec![self.0; edges.len()]
    }
}
