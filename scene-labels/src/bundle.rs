//! The fixed-shape label bundle produced for one scene.
//!
//! `N` is the sampled point count and `K` the box slot count
//! (`boxes.max_instances`).
//!
//! | Field | Shape |
//! |-------|-------|
//! | `points` | N x (3 + C) |
//! | `boxes.*` | K (or K x 3), zero beyond the valid slots |
//! | `center_votes`, `corner_votes` | N x 9 (one vote tiled three times) |
//! | `vote_mask`, `semantic_labels` | N |
//! | `planes.points` | N x 7 (xyz + plane-patch vector) |
//! | `planes.mask`, `planes.faces[f].offsets` | N |
//! | `planes.faces[f].normals` | N x 3 |
//! | `voxels.*` | grid dims |

use serde::{Deserialize, Serialize};

use crate::augment::AugmentationRecord;
use crate::config::ClassTable;
use crate::core::{Point3, PointCloud};
use crate::geometry::{Face, HeadingBins, OrientedBox, residual_to_size, size_residual};
use crate::resolver::ResolvedInstance;
use crate::synthesis::PointLabels;
use crate::voxel::VoxelLabels;

/// Votes are repeated this many times per point.
pub const VOTE_TILES: usize = 3;

/// Per-slot box targets, K entries each.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxLabels {
    /// Box centers
    pub centers: Vec<[f32; 3]>,
    /// Box extents
    pub sizes: Vec<[f32; 3]>,
    /// 1 for valid slots
    pub mask: Vec<f32>,
    /// Heading sector
    pub heading_class: Vec<i64>,
    /// Offset from the heading sector center
    pub heading_residual: Vec<f32>,
    /// Size class (equal to the semantic class)
    pub size_class: Vec<i64>,
    /// Offset from the class mean size
    pub size_residual: Vec<[f32; 3]>,
    /// Contiguous class index
    pub semantic_class: Vec<i64>,
    /// Source instance id (0 for padding)
    pub instance_ids: Vec<u32>,
    /// Heading sector count used for discretization
    pub num_heading_bins: usize,
}

impl BoxLabels {
    /// Fill up to `max_instances` slots from `instances`, in order.
    ///
    /// Returns the labels and the number of instances that did not fit.
    pub fn from_instances(
        instances: &[ResolvedInstance],
        classes: &ClassTable,
        bins: HeadingBins,
        max_instances: usize,
    ) -> (Self, usize) {
        let k = max_instances;
        let mut labels = Self {
            centers: vec![[0.0; 3]; k],
            sizes: vec![[0.0; 3]; k],
            mask: vec![0.0; k],
            heading_class: vec![0; k],
            heading_residual: vec![0.0; k],
            size_class: vec![0; k],
            size_residual: vec![[0.0; 3]; k],
            semantic_class: vec![0; k],
            instance_ids: vec![0; k],
            num_heading_bins: bins.num_bins(),
        };

        for (slot, inst) in instances.iter().take(k).enumerate() {
            let bx = &inst.bbox;
            let (heading_class, heading_residual) = bins.angle_to_class(bx.heading as f64);
            let mean = classes.mean_size(inst.class_index).unwrap_or(Point3::ZERO);

            labels.centers[slot] = bx.center.to_array();
            labels.sizes[slot] = bx.size.to_array();
            labels.mask[slot] = 1.0;
            labels.heading_class[slot] = heading_class as i64;
            labels.heading_residual[slot] = heading_residual as f32;
            labels.size_class[slot] = inst.class_index as i64;
            labels.size_residual[slot] = size_residual(bx.size, mean).to_array();
            labels.semantic_class[slot] = inst.class_index as i64;
            labels.instance_ids[slot] = inst.instance_id;
        }

        (labels, instances.len().saturating_sub(k))
    }

    /// Number of slots (K)
    pub fn capacity(&self) -> usize {
        self.mask.len()
    }

    /// Number of valid slots
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m > 0.0).count()
    }
}

/// Plane targets for one face, N entries each.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceTargets {
    /// Which face
    pub face: Face,
    /// Unit normals
    pub normals: Vec<[f32; 3]>,
    /// Offsets
    pub offsets: Vec<f32>,
}

/// Per-point plane targets.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneLabels {
    /// xyz followed by the plane-patch vector
    pub points: Vec<[f32; 7]>,
    /// 1 for points of labelled plane groups
    pub mask: Vec<f32>,
    /// Targets in [`Face::ALL`] order
    pub faces: [FaceTargets; 6],
}

impl PlaneLabels {
    /// Targets of one face
    pub fn face(&self, face: Face) -> &FaceTargets {
        &self.faces[face.index()]
    }
}

/// Counters describing how one bundle was produced.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Rejection-sampling draws used
    pub sampling_attempts: usize,
    /// Instances with a supervised class
    pub retained_instances: usize,
    /// Instances dropped for an unsupervised class
    pub excluded_instances: usize,
    /// Plane groups that received labels
    pub plane_groups: usize,
    /// Plane patches below the support threshold
    pub small_plane_groups: usize,
    /// Plane groups skipped because the face fit was degenerate
    pub degenerate_plane_groups: usize,
    /// Instance points without votes (non-finite coordinates)
    pub unvoted_points: usize,
}

/// Everything synthesized for one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBundle {
    /// Scene identifier
    pub scene_name: String,
    /// Sampled, augmented points with feature channels
    pub points: PointCloud,
    /// Box slots
    pub boxes: BoxLabels,
    /// Center votes, tiled
    pub center_votes: Vec<[f32; 9]>,
    /// Nearest-corner votes, tiled
    pub corner_votes: Vec<[f32; 9]>,
    /// 1 for points of supervised instances
    pub vote_mask: Vec<f32>,
    /// Contiguous class index per point (as `boxes.semantic_class`); 0 where `vote_mask` is 0
    pub semantic_labels: Vec<i64>,
    /// Face plane targets
    pub planes: PlaneLabels,
    /// Occupancy and heatmaps
    pub voxels: VoxelLabels,
    /// Augmentation applied to every geometric field
    pub augmentation: AugmentationRecord,
    /// Retained instances that did not fit into the box slots
    pub dropped_instances: usize,
    /// Production counters
    pub stats: LabelStats,
}

impl LabelBundle {
    /// Pack per-point labels and box slots into a bundle.
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        scene_name: String,
        points: PointCloud,
        plane_vectors: &[[f32; 4]],
        point_labels: PointLabels,
        boxes: BoxLabels,
        voxels: VoxelLabels,
        augmentation: AugmentationRecord,
        dropped_instances: usize,
        stats: LabelStats,
    ) -> Self {
        let plane_points = points
            .iter_xyz()
            .zip(plane_vectors)
            .map(|(p, v)| [p.x, p.y, p.z, v[0], v[1], v[2], v[3]])
            .collect();

        let PointLabels {
            center_votes,
            corner_votes,
            vote_mask,
            semantic_labels,
            plane_mask,
            face_normals,
            face_offsets,
            ..
        } = point_labels;

        let mut normals = face_normals.into_iter();
        let mut offsets = face_offsets.into_iter();
        let faces = Face::ALL.map(|face| FaceTargets {
            face,
            normals: normals.next().unwrap_or_default(),
            offsets: offsets.next().unwrap_or_default(),
        });

        Self {
            scene_name,
            points,
            boxes,
            center_votes: tile_votes(&center_votes),
            corner_votes: tile_votes(&corner_votes),
            vote_mask,
            semantic_labels,
            planes: PlaneLabels {
                points: plane_points,
                mask: plane_mask,
                faces,
            },
            voxels,
            augmentation,
            dropped_instances,
            stats,
        }
    }

    /// Number of points (N)
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Reconstruct the box of every valid slot from its discretized labels.
    ///
    /// Boxes are in the augmented frame.
    pub fn decode_boxes(&self, classes: &ClassTable) -> Vec<OrientedBox> {
        let bins = HeadingBins::new(self.boxes.num_heading_bins);
        let b = &self.boxes;
        (0..b.capacity())
            .filter(|&slot| b.mask[slot] > 0.0)
            .map(|slot| {
                let mean = classes
                    .mean_size(b.size_class[slot] as usize)
                    .unwrap_or(Point3::ZERO);
                let heading = bins.class_to_angle(
                    b.heading_class[slot] as usize,
                    b.heading_residual[slot] as f64,
                );
                OrientedBox::new(
                    Point3::from_array(b.centers[slot]),
                    residual_to_size(Point3::from_array(b.size_residual[slot]), mean),
                    heading as f32,
                )
            })
            .collect()
    }
}

/// Repeat each 3-vector [`VOTE_TILES`] times.
pub fn tile_votes(votes: &[[f32; 3]]) -> Vec<[f32; 9]> {
    votes
        .iter()
        .map(|v| std::array::from_fn(|k| v[k % 3]))
        .collect()
}
