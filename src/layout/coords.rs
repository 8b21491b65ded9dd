use std::collections::BTreeMap;

use crate::config::DEFAULT_FUDGE;
use crate::ir::Edge;

use super::types::Slot;

/// Even rows hold a pivot's sources, odd rows its destinations. Pivot pairs
/// advance by `fudge_y + spacer_y`; a destination row sits `spacer_y` past
/// its source row. Row 0 is lifted to `-2 * spacer_y`.
pub fn row_to_y(row: f64, fudge_y: f64, spacer_y: f64) -> f64 {
    if row > 0.0 {
        let parity = ((row.trunc() as i64) & 1) as f64;
        (fudge_y + spacer_y) * (row - parity) + spacer_y * parity
    } else {
        -2.0 * spacer_y
    }
}

pub fn merge_rows_columns_to_xy(
    slots: &BTreeMap<String, Slot>,
    fudge_x: f64,
    fudge_y: f64,
    spacer_y: f64,
) -> BTreeMap<String, (f64, f64)> {
    slots
        .iter()
        .map(|(id, slot)| {
            let x = fudge_x * slot.column;
            let y = row_to_y(slot.row, fudge_y, spacer_y);
            (id.clone(), (x, y))
        })
        .collect()
}

/// Row pitch scaled by the square root of the busiest pivot's edge count, so
/// wide fan-outs get more vertical room.
pub fn default_fudge_y(edges: &[Edge]) -> f64 {
    let mut per_pivot: BTreeMap<u32, usize> = BTreeMap::new();
    for edge in edges {
        *per_pivot.entry(edge.pivot).or_insert(0) += 1;
    }
    let busiest = per_pivot.values().copied().max().unwrap_or(1).max(1);
    -DEFAULT_FUDGE * (busiest as f64).sqrt()
}
