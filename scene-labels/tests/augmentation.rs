//! Augmentation consistency between points, votes, boxes and heatmaps.

mod common;

use approx::assert_relative_eq;
use common::*;
use scene_labels::geometry::PlaneFitConfig;
use scene_labels::resolver::InstanceTable;
use scene_labels::synthesis::synthesize_point_labels;
use scene_labels::{AugmentationRecord, BoxMode, ClassTable, LabelConfig, LabelSynthesizer, Point3};

fn single_table(heading: f32) -> scene_labels::Scene {
    let objects = [ObjectSpec::new(1, TABLE, Point3::new(0.6, -0.4, 0.4), Point3::new(1.2, 0.8, 0.8))
        .with_heading(heading)];
    build_scene("table", &objects, 0, 41)
}

fn augmented(mut config: LabelConfig, flip_probability: f32, max_rotation: f32) -> LabelConfig {
    config.augment.enabled = true;
    config.augment.flip_probability = flip_probability;
    config.augment.max_rotation = max_rotation;
    config
}

#[test]
fn test_double_flip_mirrors_votes() {
    let scene = living_room(7);
    let plain = LabelSynthesizer::new(config_with_points(500)).unwrap();
    let flipped = LabelSynthesizer::new(augmented(config_with_points(500), 1.0, 0.0)).unwrap();

    let a = plain.synthesize(&scene, 17).unwrap();
    let b = flipped.synthesize(&scene, 17).unwrap();

    assert!(b.augmentation.flip_x && b.augmentation.flip_y);
    assert_eq!(a.vote_mask, b.vote_mask);
    for i in 0..a.num_points() {
        let (pa, pb) = (a.points.xyz(i), b.points.xyz(i));
        assert_eq!(pb, Point3::new(-pa.x, -pa.y, pa.z));

        let (va, vb) = (a.center_votes[i], b.center_votes[i]);
        assert_eq!(vb[0], -va[0]);
        assert_eq!(vb[1], -va[1]);
        assert_eq!(vb[2], va[2]);
    }
    for slot in 0..a.boxes.count() {
        let (ca, cb) = (a.boxes.centers[slot], b.boxes.centers[slot]);
        assert_eq!(cb, [-ca[0], -ca[1], ca[2]]);
    }
}

/// Apply one reflection to a resolved scene and compare votes against the
/// unreflected labels.
fn check_single_reflection(flip_x: bool, flip_y: bool) {
    let scene = single_table(0.3);
    let fit = PlaneFitConfig::default();
    let table = InstanceTable::resolve(&scene, &ClassTable::scannet(), 10).unwrap();
    let plain = synthesize_point_labels(&scene.points, &table, &fit);

    let mut points = scene.points.clone();
    let mut plane_vectors = scene.plane_vectors.clone();
    let mut mirrored_table = table.clone();
    let record = AugmentationRecord::new(flip_x, flip_y, 0.0);
    record.apply(&mut points, &mut plane_vectors, &mut mirrored_table, BoxMode::Oriented);
    let mirrored = synthesize_point_labels(&points, &mirrored_table, &fit);

    let sx = if flip_x { -1.0 } else { 1.0 };
    let sy = if flip_y { -1.0 } else { 1.0 };
    for i in 0..points.len() {
        let (p, q) = (scene.points.xyz(i), points.xyz(i));
        assert_eq!(q, Point3::new(sx * p.x, sy * p.y, p.z));

        let (v, w) = (plain.center_votes[i], mirrored.center_votes[i]);
        assert_eq!(w, [sx * v[0], sy * v[1], v[2]]);
        assert_eq!(mirrored.vote_mask[i], 1.0);
    }

    let (before, after) = (&table.instances()[0].bbox, &mirrored_table.instances()[0].bbox);
    assert_eq!(after.center, Point3::new(sx * before.center.x, sy * before.center.y, before.center.z));
    assert_eq!(after.size, before.size);
    assert_relative_eq!(after.heading, -before.heading, epsilon = 1e-6);
}

#[test]
fn test_x_reflection_mirrors_votes() {
    check_single_reflection(true, false);
}

#[test]
fn test_y_reflection_mirrors_votes() {
    check_single_reflection(false, true);
}

#[test]
fn test_disabled_augmentation_is_identity() {
    let synthesizer = LabelSynthesizer::new(config_with_points(300)).unwrap();
    let bundle = synthesizer.synthesize(&living_room(8), 3).unwrap();
    assert!(bundle.augmentation.is_identity());
}

#[test]
fn test_rotated_votes_point_at_rotated_center() {
    let scene = single_table(0.3);
    let mut config = augmented(config_with_points(200), 0.5, std::f32::consts::FRAC_PI_6);
    config.boxes.mode = BoxMode::Oriented;
    config.boxes.num_heading_bins = 12;
    let synthesizer = LabelSynthesizer::new(config).unwrap();

    for seed in 0..8 {
        let bundle = synthesizer.synthesize(&scene, seed).unwrap();
        let aug = bundle.augmentation;
        assert!(aug.angle.abs() <= std::f32::consts::FRAC_PI_6);

        let center = Point3::from_array(bundle.boxes.centers[0]);
        let original = aug.invert_point(center);
        assert_relative_eq!(original.x, 0.6, epsilon = 1e-5);
        assert_relative_eq!(original.y, -0.4, epsilon = 1e-5);
        assert_relative_eq!(original.z, 0.4, epsilon = 1e-5);

        for i in 0..bundle.num_points() {
            let p = bundle.points.xyz(i);
            let v = bundle.center_votes[i];
            let target = p + Point3::new(v[0], v[1], v[2]);
            assert_relative_eq!(target.distance(&center), 0.0, epsilon = 1e-5);
        }

        let decoded = bundle.decode_boxes(&synthesizer.config().classes);
        // Each flip mirrors the heading; boxes are symmetric under a half turn
        let flips = aug.flip_x as i32 + aug.flip_y as i32;
        let base = if flips == 1 { -0.3f32 } else { 0.3 };
        let expected = base + aug.angle;
        let diff = (decoded[0].heading - expected).rem_euclid(2.0 * std::f32::consts::PI);
        let diff = diff.min(2.0 * std::f32::consts::PI - diff);
        assert!(diff < 1e-4, "seed {seed}: heading {} vs {}", decoded[0].heading, expected);
    }
}

#[test]
fn test_heatmap_peaks_follow_augmented_center() {
    let scene = single_table(0.0);
    let synthesizer =
        LabelSynthesizer::new(augmented(config_with_points(200), 1.0, 0.2)).unwrap();
    let bundle = synthesizer.synthesize(&scene, 5).unwrap();

    let center = Point3::from_array(bundle.boxes.centers[0]);
    let voxel = bundle.voxels.spec().voxel_of(center).unwrap();
    assert_relative_eq!(bundle.voxels.center_heat.get(voxel), 1.0, epsilon = 1e-6);
    assert!(bundle.voxels.corner_heat.count_nonzero() > 0);
    assert!(bundle.voxels.occupancy.count_nonzero() > 0);
}

#[test]
fn test_plane_normals_stay_unit_under_rotation() {
    let objects = [ObjectSpec::new(1, BED, Point3::new(0.0, 0.0, 0.4), Point3::new(2.0, 1.6, 0.8))];
    let scene = build_scene("bed", &objects, 0, 43);
    let mut config = augmented(config_with_points(200), 0.5, 0.5);
    config.boxes.mode = BoxMode::Oriented;
    let bundle = LabelSynthesizer::new(config).unwrap().synthesize(&scene, 9).unwrap();

    let mut labelled = 0;
    for i in 0..bundle.num_points() {
        if bundle.planes.mask[i] == 0.0 {
            continue;
        }
        labelled += 1;
        for face in scene_labels::Face::ALL {
            let n = bundle.planes.face(face).normals[i];
            let norm = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert_relative_eq!(norm, 1.0, epsilon = 1e-4);
        }
        // Augmented raw plane vector keeps a unit normal too
        let raw = bundle.planes.points[i];
        let norm = (raw[3] * raw[3] + raw[4] * raw[4] + raw[5] * raw[5]).sqrt();
        assert_relative_eq!(norm, 1.0, epsilon = 1e-5);
    }
    assert_eq!(labelled, 100);
}
