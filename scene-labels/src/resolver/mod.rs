//! Correspondence resolver.
//!
//! Collapses the per-point object metadata of a scene into one entry per
//! instance, keyed by instance id, and partitions each instance's points into
//! plane patches.
//!
//! ## Rules
//!
//! - Instance id 0 is background and never resolved.
//! - The representative semantic id is that of the instance's first member
//!   point. Instances whose representative id is not a supervised class are
//!   excluded: they stay in the point cloud but receive no labels.
//! - For retained instances every member must agree with the canonical row
//!   (box parameters bit-for-bit, instance id, semantic id). Disagreement is
//!   an [`InputInconsistency`](LabelError::InputInconsistency).
//! - Plane patches (id != 0) with fewer than `min_plane_points` members are
//!   discarded as noise.
//!
//! Instances are ordered by ascending instance id and plane groups by
//! ascending patch id, so resolution is deterministic.

use std::collections::BTreeMap;

use log::debug;

use crate::config::ClassTable;
use crate::core::{Scene, normalize_angle};
use crate::error::{LabelError, Result};
use crate::geometry::OrientedBox;

/// Points of one instance sharing a plane patch id.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneGroup {
    /// Plane patch id (nonzero)
    pub patch_id: u32,
    /// Scene point indices
    pub point_indices: Vec<usize>,
}

/// One supervised object.
#[derive(Clone, Debug)]
pub struct ResolvedInstance {
    /// Instance id
    pub instance_id: u32,
    /// Raw semantic id
    pub semantic_id: u32,
    /// Contiguous class index
    pub class_index: usize,
    /// Box in the current scene frame
    pub bbox: OrientedBox,
    /// Scene point indices of every member
    pub point_indices: Vec<usize>,
    /// Plane patches with enough support
    pub plane_groups: Vec<PlaneGroup>,
}

/// Instance-indexed table built once per scene.
#[derive(Clone, Debug, Default)]
pub struct InstanceTable {
    instances: Vec<ResolvedInstance>,
    excluded: Vec<u32>,
    small_plane_groups: usize,
}

impl InstanceTable {
    /// Resolve the instances of `scene`.
    pub fn resolve(scene: &Scene, classes: &ClassTable, min_plane_points: usize) -> Result<Self> {
        let mut members: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, &id) in scene.instance_ids.iter().enumerate() {
            if id != 0 {
                members.entry(id).or_default().push(i);
            }
        }

        let mut table = InstanceTable::default();

        for (instance_id, point_indices) in members {
            let first = point_indices[0];
            let semantic_id = scene.semantic_ids[first];
            let Some(class_index) = classes.class_index(semantic_id) else {
                table.excluded.push(instance_id);
                continue;
            };

            let row = scene.objects[first];
            let inconsistent = |field: &'static str| LabelError::InputInconsistency { instance_id, field };

            if row.instance_id != instance_id {
                return Err(inconsistent("instance_id"));
            }
            if row.semantic_id != semantic_id {
                return Err(inconsistent("semantic_id"));
            }
            if !(row.center.is_finite() && row.size.is_finite() && row.heading.is_finite()) {
                return Err(inconsistent("box"));
            }
            for &i in &point_indices[1..] {
                if scene.semantic_ids[i] != semantic_id {
                    return Err(inconsistent("semantic_id"));
                }
                let other = &scene.objects[i];
                if other.instance_id != instance_id {
                    return Err(inconsistent("instance_id"));
                }
                if other.semantic_id != semantic_id {
                    return Err(inconsistent("semantic_id"));
                }
                if !other.same_box(&row) {
                    return Err(inconsistent("box"));
                }
            }

            let mut patches: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
            for &i in &point_indices {
                let patch_id = scene.plane_patch_ids[i];
                if patch_id != 0 {
                    patches.entry(patch_id).or_default().push(i);
                }
            }
            let mut plane_groups = Vec::with_capacity(patches.len());
            for (patch_id, indices) in patches {
                if indices.len() >= min_plane_points {
                    plane_groups.push(PlaneGroup {
                        patch_id,
                        point_indices: indices,
                    });
                } else {
                    table.small_plane_groups += 1;
                }
            }

            table.instances.push(ResolvedInstance {
                instance_id,
                semantic_id,
                class_index,
                bbox: OrientedBox::new(row.center, row.size, normalize_angle(row.heading)),
                point_indices,
                plane_groups,
            });
        }

        debug!(
            "[Resolver] {}: {} instances, {} excluded, {} plane groups ({} too small)",
            scene.name,
            table.instances.len(),
            table.excluded.len(),
            table.plane_group_count(),
            table.small_plane_groups
        );

        Ok(table)
    }

    /// Retained instances in ascending id order
    pub fn instances(&self) -> &[ResolvedInstance] {
        &self.instances
    }

    /// Mutable access for frame transforms
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ResolvedInstance> {
        self.instances.iter_mut()
    }

    /// Number of retained instances
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True when no instance is supervised
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Look up a retained instance by id
    pub fn get(&self, instance_id: u32) -> Option<&ResolvedInstance> {
        self.instances
            .binary_search_by_key(&instance_id, |inst| inst.instance_id)
            .ok()
            .map(|i| &self.instances[i])
    }

    /// Instance ids dropped for having an unsupervised class
    pub fn excluded(&self) -> &[u32] {
        &self.excluded
    }

    /// Plane patches discarded for low support
    pub fn small_plane_groups(&self) -> usize {
        self.small_plane_groups
    }

    /// Plane groups across all retained instances
    pub fn plane_group_count(&self) -> usize {
        self.instances.iter().map(|inst| inst.plane_groups.len()).sum()
    }

    /// Force every heading to zero (axis-aligned boxes).
    pub fn zero_headings(&mut self) {
        for inst in &mut self.instances {
            inst.bbox.heading = 0.0;
        }
    }
}
