use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use rstest::rstest;
use wc3_mdl::chunks::{Node, Sequence, TextureAnim};
use wc3_mdl::optimizer::optimize_track;
use wc3_mdl::{
    AnimTrack, Document, Interpolation, OptimizeOptions, TrackValue, decode, encode, optimize,
    optimize_with,
};

/// One helper with 11 collinear keys on each transform track, plus a texture
/// animation with the same translation
fn linear_doc() -> Document {
    let mut doc = Document::new("Linear");
    doc.sequences.push(Sequence::new("Walk", 0, 1000));

    let line = || AnimTrack::linear((0..=10u32).map(|i| (i * 100, Vec3::splat(i as f32))));
    let mut node = Node::helper("Root");
    node.header.translation = Some(line());
    node.header.scaling = Some(line());
    node.header.rotation = Some(AnimTrack::linear(
        (0..=10u32).map(|i| (i * 100, Quat::from_rotation_y(i as f32 * 0.1))),
    ));
    doc.nodes.push(node);
    doc.texture_anims.push(TextureAnim {
        translation: Some(line()),
        ..TextureAnim::default()
    });
    doc
}

fn key_counts(doc: &Document) -> (usize, usize, usize, usize) {
    let header = &doc.nodes[0].header;
    (
        header.translation.as_ref().map_or(0, AnimTrack::key_count),
        header.rotation.as_ref().map_or(0, AnimTrack::key_count),
        header.scaling.as_ref().map_or(0, AnimTrack::key_count),
        doc.texture_anims[0]
            .translation
            .as_ref()
            .map_or(0, AnimTrack::key_count),
    )
}

#[test]
fn test_all_tracks_reduced() {
    let mut doc = linear_doc();
    let report = optimize(&mut doc, 1e-4);
    assert_eq!(report.tracks, 4);
    assert_eq!(report.tracks_changed, 4);
    assert_eq!(report.keys_before, 44);
    assert_eq!(report.keys_after, 8);
    assert_eq!(key_counts(&doc), (2, 2, 2, 2));
}

#[rstest]
#[case::translation_only(true, false, false, (2, 11, 11, 2))]
#[case::rotation_only(false, true, false, (11, 2, 11, 11))]
#[case::scaling_only(false, false, true, (11, 11, 2, 11))]
fn test_track_selection(
    #[case] translation: bool,
    #[case] rotation: bool,
    #[case] scaling: bool,
    #[case] expected: (usize, usize, usize, usize),
) {
    let mut doc = linear_doc();
    let options = OptimizeOptions {
        translation,
        rotation,
        scaling,
        ..OptimizeOptions::default()
    };
    optimize_with(&mut doc, &options);
    assert_eq!(key_counts(&doc), expected);
}

#[test]
fn test_large_tolerance_keeps_sequence_ends() {
    let mut doc = linear_doc();
    let track = doc.nodes[0].header.translation.as_mut().unwrap();
    track.keys[5].value = Vec3::new(5.0, 9.0, 5.0);

    optimize(&mut doc, 100.0);
    let times: Vec<u32> = doc.nodes[0]
        .header
        .translation
        .as_ref()
        .unwrap()
        .keys
        .iter()
        .map(|k| k.time)
        .collect();
    assert_eq!(times, vec![0, 1000]);
}

#[test]
fn test_spike_survives_small_tolerance() {
    let mut doc = linear_doc();
    let track = doc.nodes[0].header.translation.as_mut().unwrap();
    track.keys[5].value = Vec3::new(5.0, 9.0, 5.0);

    optimize(&mut doc, 1e-4);
    let track = doc.nodes[0].header.translation.as_ref().unwrap();
    let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0, 400, 500, 600, 1000]);
}

#[test]
fn test_hermite_becomes_linear_and_stays_encodable() {
    let mut doc = linear_doc();
    let track = doc.nodes[0].header.translation.as_mut().unwrap();
    track.interpolation = Interpolation::Hermite;
    for key in &mut track.keys {
        key.tangents = Some(wc3_mdl::track::Tangents {
            in_tan: key.value,
            out_tan: key.value,
        });
    }

    optimize(&mut doc, 1e-4);
    let track = doc.nodes[0].header.translation.as_ref().unwrap();
    assert_eq!(track.interpolation, Interpolation::Linear);
    assert!(track.keys.iter().all(|k| k.tangents.is_none()));

    let text = encode(&doc).expect("optimized document encodes");
    assert!(!text.contains("InTan"));
    let decoded = decode(text.as_bytes()).expect("decode");
    assert_eq!(decoded.nodes[0].header.translation, doc.nodes[0].header.translation);
}

#[test]
fn test_optimized_fixture_round_trips() {
    let src = include_str!("data/footman.mdl");
    let mut doc = decode(src.as_bytes()).expect("decode");
    let before = doc.key_count();
    let report = optimize(&mut doc, 1e-4);
    assert_eq!(before - report.keys_removed(), doc.key_count());

    let text = encode(&doc).expect("encode");
    assert_eq!(decode(text.as_bytes()).expect("decode"), doc);
}

/// Largest deviation between any original key and the reduced track at the
/// same time
fn max_deviation<T: TrackValue>(original: &AnimTrack<T>, reduced: &AnimTrack<T>) -> f32 {
    original
        .keys
        .iter()
        .filter_map(|k| Some(k.value.deviation(&reduced.value_at(k.time as f32)?)))
        .fold(0.0, f32::max)
}

fn wavy_translation() -> AnimTrack<Vec3> {
    AnimTrack::linear((0..=15u32).map(|i| {
        let x = i as f32;
        (i * 100, Vec3::new(x, (x * 0.7).sin() * 1.5, (x * 1.3).cos()))
    }))
}

fn wavy_rotation() -> AnimTrack<Quat> {
    AnimTrack::linear((0..=15u32).map(|i| {
        let x = i as f32;
        (i * 100, Quat::from_rotation_z((x * 0.5).sin()) * Quat::from_rotation_x(x * 0.1))
    }))
}

#[rstest]
#[case::overlapping(vec![(0, 1000), (500, 1500)])]
#[case::adjacent(vec![(0, 700), (700, 1500)])]
#[case::nested(vec![(0, 1500), (300, 900)])]
#[case::gap(vec![(0, 400), (600, 1500)])]
fn test_removed_keys_stay_within_tolerance(#[case] intervals: Vec<(u32, u32)>) {
    let sequences: Vec<Sequence> = intervals
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| Sequence::new(format!("Seq{i}"), start, end))
        .collect();

    for tolerance in [0.05, 0.5, 2.0] {
        let original = wavy_translation();
        let mut reduced = original.clone();
        optimize_track(&mut reduced, &sequences, tolerance);
        assert!(reduced.key_count() <= original.key_count());
        let worst = max_deviation(&original, &reduced);
        assert!(worst <= tolerance + 1e-5, "translation off by {worst} at {tolerance}");
    }

    for tolerance in [1e-4, 1e-3, 1e-2] {
        let original = wavy_rotation();
        let mut reduced = original.clone();
        optimize_track(&mut reduced, &sequences, tolerance);
        let worst = max_deviation(&original, &reduced);
        assert!(worst <= tolerance + 1e-6, "rotation off by {worst} at {tolerance}");
    }
}
