//! Per-point vote and face-plane label synthesis.
//!
//! For every member point `p` of a retained instance:
//!
//! | Label | Value |
//! |-------|-------|
//! | center vote | `center - p` |
//! | corner vote | `corner[k] - p`, `k` = first argmin of squared distance |
//! | vote mask | 1 |
//! | semantic label | contiguous class index (same as the box slot's class) |
//!
//! Points with non-finite coordinates have no nearest corner and get no labels.
//!
//! Every plane group of an instance receives the same six face planes, fit
//! once from that instance's box corners. If the fit is degenerate none of the
//! instance's groups get plane labels.

use log::warn;

use crate::core::{Point3, PointCloud};
use crate::geometry::{Face, FacePlanes, PlaneFitConfig, pairwise_squared_distance};
use crate::resolver::InstanceTable;

/// Per-point labels for one scene, N entries each.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLabels {
    /// Displacement to the instance center
    pub center_votes: Vec<[f32; 3]>,
    /// Displacement to the nearest box corner
    pub corner_votes: Vec<[f32; 3]>,
    /// 1 for points of retained instances
    pub vote_mask: Vec<f32>,
    /// Contiguous class index; 0 for unsupervised points, see `vote_mask`
    pub semantic_labels: Vec<i64>,
    /// 1 for points of labelled plane groups
    pub plane_mask: Vec<f32>,
    /// Per-face unit normals, indexed by [`Face::index`]
    pub face_normals: [Vec<[f32; 3]>; 6],
    /// Per-face offsets, indexed by [`Face::index`]
    pub face_offsets: [Vec<f32>; 6],
    /// Plane groups that received labels
    pub labelled_plane_groups: usize,
    /// Plane groups skipped because the face fit was degenerate
    pub degenerate_plane_groups: usize,
    /// Member points left unlabelled because their coordinates are not finite
    pub unvoted_points: usize,
}

impl PointLabels {
    /// All-zero labels for `n` points
    pub fn zeros(n: usize) -> Self {
        Self {
            center_votes: vec![[0.0; 3]; n],
            corner_votes: vec![[0.0; 3]; n],
            vote_mask: vec![0.0; n],
            semantic_labels: vec![0; n],
            plane_mask: vec![0.0; n],
            face_normals: std::array::from_fn(|_| vec![[0.0; 3]; n]),
            face_offsets: std::array::from_fn(|_| vec![0.0; n]),
            labelled_plane_groups: 0,
            degenerate_plane_groups: 0,
            unvoted_points: 0,
        }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.vote_mask.len()
    }

    /// True when there are no points
    pub fn is_empty(&self) -> bool {
        self.vote_mask.is_empty()
    }

    /// Normals of one face
    pub fn normals(&self, face: Face) -> &[[f32; 3]] {
        &self.face_normals[face.index()]
    }

    /// Offsets of one face
    pub fn offsets(&self, face: Face) -> &[f32] {
        &self.face_offsets[face.index()]
    }
}

/// Compute per-point labels for every retained instance in `table`.
///
/// `points` must be the cloud the table was resolved against, in the same
/// frame as the instance boxes.
pub fn synthesize_point_labels(
    points: &PointCloud,
    table: &InstanceTable,
    plane_fit: &PlaneFitConfig,
) -> PointLabels {
    let mut labels = PointLabels::zeros(points.len());

    for inst in table.instances() {
        let center = inst.bbox.center;
        let corners = inst.bbox.corners();
        let members: Vec<Point3> = inst.point_indices.iter().map(|&i| points.xyz(i)).collect();

        let distances = pairwise_squared_distance(&members, &corners);
        let nearest = distances.argmin_rows();
        let unvoted_before = labels.unvoted_points;

        for ((&i, &p), &k) in inst.point_indices.iter().zip(&members).zip(&nearest) {
            let Some(k) = k else {
                labels.unvoted_points += 1;
                continue;
            };
            labels.center_votes[i] = (center - p).to_array();
            labels.corner_votes[i] = (corners[k] - p).to_array();
            labels.vote_mask[i] = 1.0;
            labels.semantic_labels[i] = inst.class_index as i64;
        }

        if labels.unvoted_points > unvoted_before {
            warn!(
                "[Synthesis] Instance {}: {} member points with non-finite coordinates left unlabelled",
                inst.instance_id,
                labels.unvoted_points - unvoted_before
            );
        }

        if inst.plane_groups.is_empty() {
            continue;
        }

        let Some(planes) = FacePlanes::fit(&corners, plane_fit) else {
            warn!(
                "[Synthesis] Degenerate face fit for instance {}, skipping {} plane groups",
                inst.instance_id,
                inst.plane_groups.len()
            );
            labels.degenerate_plane_groups += inst.plane_groups.len();
            continue;
        };

        for group in &inst.plane_groups {
            for &i in &group.point_indices {
                labels.plane_mask[i] = 1.0;
                for face in Face::ALL {
                    let plane = planes.get(face);
                    labels.face_normals[face.index()][i] = plane.normal_f32();
                    labels.face_offsets[face.index()][i] = plane.offset as f32;
                }
            }
            labels.labelled_plane_groups += 1;
        }
    }

    labels
}
