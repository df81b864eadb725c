//! Per-class mean box size estimation over a dataset.
//!
//! Produces the `mean_size` column of a [`ClassTable`]. Object rows are
//! redundant per point, so each scene's rows are deduplicated before they are
//! counted.

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::core::{ObjectRow, Scene};

use super::ClassTable;
use super::defaults;

/// Running per-semantic-id box size sums.
#[derive(Clone, Debug)]
pub struct MeanSizeAccumulator {
    ignored: Vec<u32>,
    sums: BTreeMap<u32, ([f64; 3], usize)>,
}

impl Default for MeanSizeAccumulator {
    fn default() -> Self {
        Self::new(defaults::ignored_semantic_ids())
    }
}

impl MeanSizeAccumulator {
    /// Create an accumulator that skips the given semantic ids.
    pub fn new(ignored: Vec<u32>) -> Self {
        Self {
            ignored,
            sums: BTreeMap::new(),
        }
    }

    /// Add the objects of one scene. Returns the number of objects counted.
    pub fn add_scene(&mut self, scene: &Scene) -> usize {
        let counted = self.add_rows(&scene.objects);
        debug!("[MeanSize] {}: {} objects", scene.name, counted);
        counted
    }

    /// Add object rows, counting each distinct row once.
    pub fn add_rows(&mut self, rows: &[ObjectRow]) -> usize {
        let mut seen = HashSet::new();
        let mut counted = 0;

        for row in rows {
            if self.ignored.contains(&row.semantic_id) || !seen.insert(row_key(row)) {
                continue;
            }
            let (sum, count) = self.sums.entry(row.semantic_id).or_insert(([0.0; 3], 0));
            for (s, v) in sum.iter_mut().zip(row.size.to_array()) {
                *s += v as f64;
            }
            *count += 1;
            counted += 1;
        }
        counted
    }

    /// Objects counted for a semantic id
    pub fn count(&self, semantic_id: u32) -> usize {
        self.sums.get(&semantic_id).map_or(0, |&(_, n)| n)
    }

    /// Mean size per semantic id, in ascending id order
    pub fn mean_sizes(&self) -> BTreeMap<u32, [f32; 3]> {
        self.sums
            .iter()
            .map(|(&id, &(sum, n))| (id, sum.map(|s| (s / n as f64) as f32)))
            .collect()
    }

    /// Overwrite the mean sizes of every class in `table` that was observed.
    ///
    /// Returns the number of classes updated.
    pub fn update_table(&self, table: &mut ClassTable) -> usize {
        self.mean_sizes()
            .into_iter()
            .filter(|&(id, size)| table.set_mean_size(id, size))
            .count()
    }
}

/// Bit pattern of the full row, so identical rows collapse exactly.
fn row_key(row: &ObjectRow) -> [u32; 9] {
    let c = row.center.to_array();
    let s = row.size.to_array();
    [
        c[0].to_bits(),
        c[1].to_bits(),
        c[2].to_bits(),
        s[0].to_bits(),
        s[1].to_bits(),
        s[2].to_bits(),
        row.heading.to_bits(),
        row.instance_id,
        row.semantic_id,
    ]
}
