//! End-to-end label synthesis tests.

mod common;

use std::collections::BTreeSet;
use std::path::Path;

use approx::assert_relative_eq;
use common::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scene_labels::augment::subsample;
use scene_labels::io::StatsSink;
use scene_labels::{
    BoxMode, ClassTable, Face, LabelConfig, LabelSynthesizer, PlyVoteSink, Point3,
};

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_seed_same_bundle() {
    let _ = env_logger::builder().is_test(true).try_init();
    let synthesizer = LabelSynthesizer::new(config_with_points(512)).unwrap();
    let scene = living_room(1);

    let a = synthesizer.synthesize(&scene, 99).unwrap();
    let b = synthesizer.synthesize(&scene, 99).unwrap();
    assert_eq!(a, b);

    let c = synthesizer.synthesize(&scene, 100).unwrap();
    assert_ne!(a.points, c.points);
}

#[test]
fn test_batch_matches_single_scene_calls() {
    let synthesizer = LabelSynthesizer::new(config_with_points(256)).unwrap();
    let scenes = vec![living_room(3), chair_row(5, 4), living_room(5)];

    let batch = synthesizer.synthesize_batch(&scenes, 1000);
    assert_eq!(batch.len(), 3);
    for (i, (scene, result)) in scenes.iter().zip(batch).enumerate() {
        let single = synthesizer.synthesize(scene, 1000 + i as u64).unwrap();
        assert_eq!(result.unwrap(), single);
    }
}

// ============================================================================
// Shapes and contents
// ============================================================================

#[test]
fn test_output_shapes() {
    let mut config = config_with_points(600);
    config.features.use_color = true;
    config.features.use_height = true;
    let synthesizer = LabelSynthesizer::new(config).unwrap();
    let bundle = synthesizer.synthesize(&living_room(2), 7).unwrap();

    let n = 600;
    assert_eq!(bundle.num_points(), n);
    assert_eq!(bundle.points.channels(), 7);
    assert_eq!(bundle.center_votes.len(), n);
    assert_eq!(bundle.corner_votes.len(), n);
    assert_eq!(bundle.vote_mask.len(), n);
    assert_eq!(bundle.semantic_labels.len(), n);
    assert_eq!(bundle.planes.points.len(), n);
    assert_eq!(bundle.planes.mask.len(), n);
    for face in Face::ALL {
        assert_eq!(bundle.planes.face(face).face, face);
        assert_eq!(bundle.planes.face(face).normals.len(), n);
        assert_eq!(bundle.planes.face(face).offsets.len(), n);
    }

    assert_eq!(bundle.boxes.capacity(), 64);
    assert_eq!(bundle.voxels.spec().dims, [128, 128, 48]);
    assert_eq!(bundle.voxels.center_heat.as_slice().len(), 128 * 128 * 48);

    // Bed, chair, table kept; wall excluded
    assert_eq!(bundle.stats.retained_instances, 3);
    assert_eq!(bundle.stats.excluded_instances, 1);
    assert_eq!(bundle.boxes.count(), 3);
    assert_eq!(bundle.boxes.instance_ids[..3], [1, 2, 3]);
    assert_eq!(bundle.dropped_instances, 0);
}

#[test]
fn test_center_votes_exact_for_single_instance() {
    let objects = [ObjectSpec::new(
        1,
        CHAIR,
        Point3::new(0.3, -0.2, 0.45),
        Point3::new(0.5, 0.6, 0.9),
    )];
    let scene = build_scene("single", &objects, 0, 11);
    let synthesizer = LabelSynthesizer::new(config_with_points(200)).unwrap();
    let bundle = synthesizer.synthesize(&scene, 0).unwrap();

    let center = Point3::from_array(bundle.boxes.centers[0]);
    assert_eq!(center, Point3::new(0.3, -0.2, 0.45));
    for i in 0..bundle.num_points() {
        let p = bundle.points.xyz(i);
        let expected = (center - p).to_array();
        assert_eq!(bundle.vote_mask[i], 1.0);
        assert_eq!(bundle.center_votes[i][..3], expected);
        assert_eq!(bundle.center_votes[i][3..6], expected);
        assert_eq!(bundle.center_votes[i][6..], expected);
    }
}

#[test]
fn test_corner_votes_reach_nearest_corner() {
    let objects = [ObjectSpec::new(1, TABLE, Point3::new(0.0, 0.0, 0.4), Point3::new(1.2, 0.8, 0.8))
        .with_heading(0.6)];
    let scene = build_scene("corner", &objects, 0, 12);
    let mut config = config_with_points(200);
    config.boxes.mode = BoxMode::Oriented;
    let bundle = LabelSynthesizer::new(config).unwrap().synthesize(&scene, 0).unwrap();

    let row = objects[0].row();
    let corners = scene_labels::geometry::box_to_corners(
        row.center, row.size.x, row.size.y, row.size.z, row.heading,
    );
    for i in 0..bundle.num_points() {
        let p = bundle.points.xyz(i);
        let v = bundle.corner_votes[i];
        let target = p + Point3::new(v[0], v[1], v[2]);
        let nearest = corners
            .iter()
            .map(|c| c.distance_squared(&p))
            .fold(f32::INFINITY, f32::min);
        assert_relative_eq!(target.distance_squared(&p), nearest, epsilon = 1e-5);
    }
}

#[test]
fn test_semantic_labels_follow_class_table() {
    let synthesizer = LabelSynthesizer::new(config_with_points(400)).unwrap();
    let bundle = synthesizer.synthesize(&living_room(6), 3).unwrap();
    let classes = ClassTable::scannet();

    let voted: BTreeSet<i64> = bundle
        .semantic_labels
        .iter()
        .zip(&bundle.vote_mask)
        .filter(|(_, m)| **m > 0.0)
        .map(|(l, _)| *l)
        .collect();
    let expected: BTreeSet<i64> = [BED, CHAIR, TABLE]
        .iter()
        .map(|&id| classes.class_index(id).unwrap() as i64)
        .collect();
    assert_eq!(voted, expected);

    // Box slots carry the same class values as their points
    let boxed: BTreeSet<i64> = bundle.boxes.semantic_class[..bundle.boxes.count()]
        .iter()
        .copied()
        .collect();
    assert_eq!(boxed, expected);

    for (mask, label) in bundle.vote_mask.iter().zip(&bundle.semantic_labels) {
        if *mask == 0.0 {
            assert_eq!(*label, 0);
        }
    }
}

#[test]
fn test_point_label_matches_box_class() {
    let objects = [ObjectSpec::new(1, CHAIR, Point3::new(0.0, 0.5, 0.45), Point3::new(0.5, 0.5, 0.9))];
    let scene = build_scene("one_chair", &objects, 0, 17);
    let bundle = LabelSynthesizer::new(config_with_points(200))
        .unwrap()
        .synthesize(&scene, 0)
        .unwrap();

    // chair (NYU40 5) is class 2
    assert_eq!(bundle.boxes.semantic_class[0], 2);
    assert!(bundle.semantic_labels.iter().all(|&l| l == bundle.boxes.semantic_class[0]));
    assert_eq!(bundle.stats.unvoted_points, 0);
}

#[test]
fn test_paired_faces_share_normals() {
    let objects = [ObjectSpec::new(1, BED, Point3::new(0.5, 0.5, 0.4), Point3::new(2.0, 1.6, 0.8))
        .with_heading(-0.8)];
    let scene = build_scene("planes", &objects, 20, 13);
    let mut config = config_with_points(220);
    config.boxes.mode = BoxMode::Oriented;
    let bundle = LabelSynthesizer::new(config).unwrap().synthesize(&scene, 5).unwrap();

    assert_eq!(bundle.stats.plane_groups, 1);
    let masked: Vec<usize> = (0..bundle.num_points())
        .filter(|&i| bundle.planes.mask[i] > 0.0)
        .collect();
    // Every other object point carries the patch id
    assert_eq!(masked.len(), 100);

    for &i in &masked {
        for (fitted, derived) in [
            (Face::Lower, Face::Upper),
            (Face::Left, Face::Right),
            (Face::Front, Face::Back),
        ] {
            assert_eq!(
                bundle.planes.face(fitted).normals[i],
                bundle.planes.face(derived).normals[i]
            );
        }
        let d_lower = bundle.planes.face(Face::Lower).offsets[i];
        let d_upper = bundle.planes.face(Face::Upper).offsets[i];
        assert_relative_eq!((d_lower - d_upper).abs(), 0.8, epsilon = 1e-4);
    }

    // Unmasked points carry no plane targets
    for i in (0..bundle.num_points()).filter(|i| !masked.contains(i)) {
        assert_eq!(bundle.planes.face(Face::Lower).normals[i], [0.0; 3]);
    }
}

// ============================================================================
// Boxes
// ============================================================================

#[test]
fn test_truncation_to_box_slots() {
    let mut config = config_with_points(200);
    config.boxes.max_instances = 4;
    let synthesizer = LabelSynthesizer::new(config).unwrap();

    let bundle = synthesizer.synthesize(&chair_row(6, 21), 2).unwrap();
    assert_eq!(bundle.boxes.capacity(), 4);
    assert_eq!(bundle.boxes.count(), 4);
    assert_eq!(bundle.dropped_instances, 2);
    assert_eq!(bundle.stats.retained_instances, 6);

    let bundle = synthesizer.synthesize(&chair_row(2, 22), 2).unwrap();
    assert_eq!(bundle.boxes.mask, vec![1.0, 1.0, 0.0, 0.0]);
    assert_eq!(bundle.dropped_instances, 0);
    for slot in 2..4 {
        assert_eq!(bundle.boxes.centers[slot], [0.0; 3]);
        assert_eq!(bundle.boxes.size_residual[slot], [0.0; 3]);
        assert_eq!(bundle.boxes.heading_class[slot], 0);
        assert_eq!(bundle.boxes.semantic_class[slot], 0);
    }
}

#[test]
fn test_decode_boxes_oriented() {
    let objects = [
        ObjectSpec::new(1, BED, Point3::new(-1.0, 1.0, 0.4), Point3::new(2.0, 1.6, 0.8))
            .with_heading(2.5),
        ObjectSpec::new(2, CHAIR, Point3::new(1.0, -1.0, 0.45), Point3::new(0.5, 0.6, 0.9))
            .with_heading(-1.2),
    ];
    let scene = build_scene("decode", &objects, 30, 14);
    let mut config = config_with_points(300);
    config.boxes.mode = BoxMode::Oriented;
    config.boxes.num_heading_bins = 12;
    let synthesizer = LabelSynthesizer::new(config).unwrap();
    let bundle = synthesizer.synthesize(&scene, 8).unwrap();

    let decoded = bundle.decode_boxes(&synthesizer.config().classes);
    assert_eq!(decoded.len(), 2);
    for (obj, bx) in objects.iter().zip(&decoded) {
        assert_eq!(bx.center, obj.center);
        assert_relative_eq!(bx.heading, obj.heading, epsilon = 1e-6);
        assert_relative_eq!(bx.size.x, obj.size.x, epsilon = 1e-6);
        assert_relative_eq!(bx.size.y, obj.size.y, epsilon = 1e-6);
        assert_relative_eq!(bx.size.z, obj.size.z, epsilon = 1e-6);
    }
}

#[test]
fn test_axis_aligned_mode_zeroes_headings() {
    let objects = [ObjectSpec::new(1, TABLE, Point3::new(0.0, 0.0, 0.4), Point3::new(1.2, 0.8, 0.8))
        .with_heading(0.9)];
    let scene = build_scene("aligned", &objects, 10, 15);
    let bundle = LabelSynthesizer::new(config_with_points(210))
        .unwrap()
        .synthesize(&scene, 1)
        .unwrap();

    assert_eq!(bundle.boxes.heading_class[0], 0);
    let decoded = bundle.decode_boxes(&ClassTable::scannet());
    assert_relative_eq!(decoded[0].heading, 0.0, epsilon = 1e-6);
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_subsample_keeps_instance_set() {
    let scene = chair_row(8, 31);
    let all: BTreeSet<u32> = scene.instance_ids.iter().copied().collect();

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let sample = subsample(&scene.instance_ids, 40, 1000, &mut rng).unwrap();
        let kept: BTreeSet<u32> = sample.indices.iter().map(|&i| scene.instance_ids[i]).collect();
        assert_eq!(kept, all, "seed {seed}");
    }
}

#[test]
fn test_upsampling_small_scene() {
    let objects = [ObjectSpec::new(1, CHAIR, Point3::new(0.0, 0.0, 0.45), Point3::new(0.5, 0.5, 0.9))
        .with_points(40)];
    let scene = build_scene("small", &objects, 10, 16);
    let bundle = LabelSynthesizer::new(config_with_points(500))
        .unwrap()
        .synthesize(&scene, 4)
        .unwrap();

    assert_eq!(bundle.num_points(), 500);
    assert_eq!(bundle.boxes.count(), 1);
}

#[test]
fn test_too_few_samples_fails() {
    let synthesizer = LabelSynthesizer::new(config_with_points(3)).unwrap();
    let err = synthesizer.synthesize(&chair_row(5, 1), 0).unwrap_err();
    assert_eq!(err.code(), "RESAMPLING_EXHAUSTED");
}

#[test]
fn test_inconsistent_metadata_fails() {
    let mut scene = living_room(9);
    let victim = scene.instance_ids.iter().position(|&id| id == 2).unwrap();
    scene.objects[victim].size.z += 0.1;

    let synthesizer = LabelSynthesizer::new(config_with_points(1020)).unwrap();
    let err = synthesizer.synthesize(&scene, 0).unwrap_err();
    assert_eq!(err.code(), "INPUT_INCONSISTENCY");
}

// ============================================================================
// Config and sinks
// ============================================================================

#[test]
fn test_shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/labels.yaml");
    let config = LabelConfig::load(&path).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.classes.len(), 18);
    assert!(LabelSynthesizer::new(config).is_ok());
}

#[test]
fn test_ply_sink_writes_layers() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = PlyVoteSink::new(dir.path());
    let synthesizer = LabelSynthesizer::new(config_with_points(300)).unwrap();

    let bundle = synthesizer
        .synthesize_into(&living_room(10), 2, &mut sink)
        .unwrap();

    let voted = bundle.vote_mask.iter().filter(|&&m| m > 0.0).count();
    let text = std::fs::read_to_string(sink.path_for("living_room", "center_votes")).unwrap();
    assert!(text.contains(&format!("element vertex {}\n", voted)));
    assert!(sink.path_for("living_room", "corner_votes").exists());
    assert!(sink.path_for("living_room", "planes").exists());
}

#[test]
fn test_stats_sink() {
    let mut sink = StatsSink::default();
    let synthesizer = LabelSynthesizer::new(config_with_points(300)).unwrap();
    synthesizer.synthesize_into(&chair_row(3, 5), 0, &mut sink).unwrap();

    assert_eq!(sink.entries.len(), 1);
    assert_eq!(sink.entries[0].0, "chair_row");
    assert_eq!(sink.entries[0].1, 3);
}
