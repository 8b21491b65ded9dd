use std::collections::BTreeSet;

use super::types::Axis;

/// One axis per pivot pair present among `rows`, labelled from 1.
pub fn generate_axes<I>(rows: I, fudge_y: f64, spacer_y: f64, enabled: bool) -> Vec<Axis>
where
    I: IntoIterator<Item = f64>,
{
    if !enabled {
        return Vec::new();
    }
    let pivots: BTreeSet<u32> = rows
        .into_iter()
        .map(|row| (row / 2.0).trunc().max(0.0) as u32)
        .collect();
    pivots
        .into_iter()
        .map(|pivot| Axis {
            label: format!("Pivot {}", pivot + 1),
            y: if pivot > 0 {
                (fudge_y + spacer_y) * f64::from(pivot) * 2.0
            } else {
                -2.0 * spacer_y
            },
        })
        .collect()
}
