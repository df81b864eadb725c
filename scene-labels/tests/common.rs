//! Test utilities for scene label synthesis.
//!
//! Builds synthetic scenes of boxes filled with points, plus background.

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_labels::{LabelConfig, ObjectRow, Point3, PointCloud, Scene};

/// NYU40 ids used by the default class table
pub const BED: u32 = 4;
pub const CHAIR: u32 = 5;
pub const TABLE: u32 = 7;
/// Not a supervised class
pub const WALL: u32 = 1;

/// One synthetic object.
#[derive(Clone, Debug)]
pub struct ObjectSpec {
    pub instance_id: u32,
    pub semantic_id: u32,
    pub center: Point3,
    pub size: Point3,
    pub heading: f32,
    pub num_points: usize,
    /// Patch id for every other point (0 = none)
    pub plane_patch: u32,
}

impl ObjectSpec {
    pub fn new(instance_id: u32, semantic_id: u32, center: Point3, size: Point3) -> Self {
        Self {
            instance_id,
            semantic_id,
            center,
            size,
            heading: 0.0,
            num_points: 200,
            plane_patch: instance_id * 100,
        }
    }

    pub fn with_heading(mut self, heading: f32) -> Self {
        self.heading = heading;
        self
    }

    pub fn with_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    pub fn row(&self) -> ObjectRow {
        ObjectRow {
            center: self.center,
            size: self.size,
            heading: self.heading,
            instance_id: self.instance_id,
            semantic_id: self.semantic_id,
        }
    }
}

/// Build a scene with xyz + rgb channels.
pub fn build_scene(name: &str, objects: &[ObjectSpec], background: usize, seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::new();
    let mut instance_ids = Vec::new();
    let mut semantic_ids = Vec::new();
    let mut plane_patch_ids = Vec::new();
    let mut plane_vectors = Vec::new();
    let mut objects_out = Vec::new();

    for obj in objects {
        let (sin, cos) = obj.heading.sin_cos();
        for i in 0..obj.num_points {
            let lx = rng.random_range(-0.45f32..0.45) * obj.size.x;
            let ly = rng.random_range(-0.45f32..0.45) * obj.size.y;
            let lz = rng.random_range(-0.45f32..0.45) * obj.size.z;
            let p = Point3::new(
                obj.center.x + cos * lx - sin * ly,
                obj.center.y + sin * lx + cos * ly,
                obj.center.z + lz,
            );
            data.extend_from_slice(&[p.x, p.y, p.z]);
            push_color(&mut data, &mut rng);

            instance_ids.push(obj.instance_id);
            semantic_ids.push(obj.semantic_id);
            let patch = if i % 2 == 0 { obj.plane_patch } else { 0 };
            plane_patch_ids.push(patch);
            plane_vectors.push(if patch != 0 {
                [0.0, 0.0, 1.0, -(obj.center.z - obj.size.z / 2.0)]
            } else {
                [0.0; 4]
            });
            objects_out.push(obj.row());
        }
    }

    for _ in 0..background {
        let p = Point3::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0), 0.0);
        data.extend_from_slice(&[p.x, p.y, p.z]);
        push_color(&mut data, &mut rng);
        instance_ids.push(0);
        semantic_ids.push(WALL);
        plane_patch_ids.push(0);
        plane_vectors.push([0.0; 4]);
        objects_out.push(ObjectRow::default());
    }

    Scene {
        name: name.to_string(),
        points: PointCloud::new(data, 6).expect("six channels"),
        instance_ids,
        semantic_ids,
        plane_patch_ids,
        plane_vectors,
        objects: objects_out,
    }
}

fn push_color(data: &mut Vec<f32>, rng: &mut StdRng) {
    for _ in 0..3 {
        data.push(rng.random_range(0.0..255.0));
    }
}

/// A small living room: bed, chair, table and an unsupervised wall.
pub fn living_room(seed: u64) -> Scene {
    let objects = [
        ObjectSpec::new(1, BED, Point3::new(-1.5, 1.0, 0.4), Point3::new(2.0, 1.6, 0.8)),
        ObjectSpec::new(2, CHAIR, Point3::new(0.8, -0.5, 0.45), Point3::new(0.5, 0.5, 0.9))
            .with_points(120),
        ObjectSpec::new(3, TABLE, Point3::new(1.2, 1.4, 0.35), Point3::new(1.2, 0.8, 0.7)),
        ObjectSpec::new(4, WALL, Point3::new(0.0, 2.9, 1.2), Point3::new(6.0, 0.1, 2.4)),
    ];
    build_scene("living_room", &objects, 300, seed)
}

/// `count` chairs in a row.
pub fn chair_row(count: u32, seed: u64) -> Scene {
    let objects: Vec<ObjectSpec> = (1..=count)
        .map(|id| {
            ObjectSpec::new(
                id,
                CHAIR,
                Point3::new(-3.0 + 0.6 * id as f32, 0.0, 0.45),
                Point3::new(0.5, 0.5, 0.9),
            )
            .with_points(30)
        })
        .collect();
    build_scene("chair_row", &objects, 50, seed)
}

/// Default config with a given sample size.
pub fn config_with_points(num_points: usize) -> LabelConfig {
    let mut config = LabelConfig::default();
    config.sampling.num_points = num_points;
    config
}
