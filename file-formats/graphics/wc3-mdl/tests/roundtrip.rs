use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use wc3_mdl::chunks::{
    CollisionShape, GeosetRef, HeadTail, LightType, NodeFlags, NodeKind, ParticleFilter,
    TextureSource,
};
use wc3_mdl::geometry::Rgb;
use wc3_mdl::{Animated, Document, EncodeOptions, Interpolation, Validator, decode, encode};

const FOOTMAN: &str = include_str!("data/footman.mdl");

#[fixture]
fn footman() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    decode(FOOTMAN.as_bytes()).expect("footman fixture should decode")
}

#[rstest]
fn test_fixture_contents(footman: Document) {
    assert_eq!(footman.name, "Footman");
    assert_eq!(footman.version, 800);
    assert_eq!(footman.sequences.len(), 2);
    assert!(footman.sequences[1].non_looping);
    assert_eq!(footman.sequences[1].rarity, 2.0);
    assert_eq!(footman.global_sequences, vec![2000]);
    assert_eq!(footman.textures[1].source, TextureSource::Replaceable(1));
    assert_eq!(footman.materials[0].layers.len(), 2);
    assert_eq!(footman.geosets[0].vertices.len(), 4);
    assert_eq!(footman.geosets[0].triangle_count(), 2);
    assert_eq!(footman.geosets[0].matrix_groups, vec![vec![0], vec![0, 1]]);
    assert_eq!(footman.geosets[0].sequence_extents.len(), 2);
    assert_eq!(footman.cameras.len(), 1);

    let names: Vec<&str> = footman.nodes.iter().map(|n| n.name()).collect();
    assert_eq!(
        names,
        vec![
            "Root",
            "Chest",
            "Glow",
            "Mount",
            "Overhead Ref",
            "Dust",
            "Trail",
            "SND0FOOT",
            "Collision"
        ]
    );
    assert_eq!(footman.nodes[1].header.parent, Some(0));
    assert_eq!(footman.nodes[1].header.pivot, Vec3::new(0.0, 0.0, 12.5));
    assert!(footman.nodes[1].header.flags.contains(NodeFlags::BILLBOARDED));
    assert!(
        footman.nodes[1]
            .header
            .flags
            .contains(NodeFlags::DONT_INHERIT_ROTATION)
    );
}

#[rstest]
fn test_fixture_payloads(footman: Document) {
    let NodeKind::Bone(root) = &footman.nodes[0].kind else {
        panic!("Root should be a bone");
    };
    assert_eq!(root.geoset, GeosetRef::Index(0));
    assert_eq!(root.geoset_anim, Some(0));

    let NodeKind::Light(light) = &footman.nodes[2].kind else {
        panic!("Glow should be a light");
    };
    assert_eq!(light.light_type, LightType::Omnidirectional);
    // Wire order is blue, green, red
    assert_eq!(light.color, Animated::Static(Rgb::new(1.0, 0.5, 0.25)));

    let NodeKind::ParticleEmitter2(dust) = &footman.nodes[5].kind else {
        panic!("Dust should be a particle emitter");
    };
    assert_eq!(dust.filter, ParticleFilter::Blend);
    assert_eq!(dust.head_tail, HeadTail::Head);
    assert_eq!(dust.segment_alpha, [255, 128, 0]);
    assert!(matches!(dust.emission_rate, Animated::Track(_)));

    let NodeKind::CollisionShape(shape) = &footman.nodes[8].kind else {
        panic!("Collision should be a collision shape");
    };
    assert_eq!(
        *shape,
        CollisionShape::Sphere {
            center: Vec3::new(0.0, 0.0, 10.0),
            radius: 30.0
        }
    );

    let root_rotation = footman.nodes[0].header.rotation.as_ref().unwrap();
    assert_eq!(root_rotation.interpolation, Interpolation::Linear);
    let end = root_rotation.keys[1].value;
    assert!((end.length() - 1.0).abs() < 1e-4);
    assert!(end.angle_between(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)) < 1e-3);

    let chest_scaling = footman.nodes[1].header.scaling.as_ref().unwrap();
    assert_eq!(chest_scaling.interpolation, Interpolation::Bezier);
    assert!(chest_scaling.keys.iter().all(|k| k.tangents.is_some()));
}

#[rstest]
fn test_fixture_is_valid(footman: Document) {
    let report = Validator::new().validate(&footman);
    assert!(!report.has_errors(), "{:?}", report.errors);
}

#[rstest]
fn test_decode_encode_decode(footman: Document) {
    let text = encode(&footman).expect("encode");
    let again = decode(text.as_bytes()).expect("re-decode");
    assert_eq!(again, footman);
}

#[rstest]
fn test_encoding_is_stable(footman: Document) {
    let first = encode(&footman).expect("encode");
    let second = encode(&footman).expect("encode again");
    assert_eq!(first, second);

    let redecoded = decode(first.as_bytes()).expect("decode");
    assert_eq!(encode(&redecoded).expect("encode decoded"), first);
}

#[rstest]
fn test_encoded_layout(footman: Document) {
    let text = encode(&footman).expect("encode");
    let order = [
        "Version {",
        "Model \"Footman\" {",
        "Sequences 2 {",
        "GlobalSequences 1 {",
        "Textures 2 {",
        "Materials 1 {",
        "TextureAnims 1 {",
        "Geoset {",
        "GeosetAnim {",
        "Bone \"Root\" {",
        "Light \"Glow\" {",
        "Helper \"Mount\" {",
        "Attachment \"Overhead Ref\" {",
        "PivotPoints 9 {",
        "ParticleEmitter2 \"Dust\" {",
        "RibbonEmitter \"Trail\" {",
        "Camera \"Portrait\" {",
        "EventObject \"SND0FOOT\" {",
        "CollisionShape \"Collision\" {",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|header| {
            text.find(&format!("\n{header}\n"))
                .or_else(|| text.starts_with(header).then_some(0))
                .unwrap_or_else(|| panic!("missing {header}"))
        })
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(text.contains("\tNumBones 2,\n\tNumLights 1,\n\tNumHelpers 1,\n"));
    assert!(text.contains("\tImage \"Units\\Human\\Footman\\Footman.blp\",\n"));
    assert!(text.contains("\t\tOutTan { 0, 0, 1 },\n"));
}

#[rstest]
fn test_header_comment_is_ignored_on_decode(footman: Document) {
    let options = EncodeOptions {
        header_comment: Some("Written by a test".to_string()),
        ..EncodeOptions::default()
    };
    let text = wc3_mdl::encode_with(&footman, &options).expect("encode");
    assert!(text.starts_with("// Written by a test\n"));
    assert_eq!(decode(text.as_bytes()).expect("decode"), footman);
}

#[rstest]
fn test_save_and_load(footman: Document) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("Footman.mdl");
    wc3_mdl::save(&path, &footman).expect("save");
    let loaded = wc3_mdl::load(&path).expect("load");
    assert_eq!(loaded, footman);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = wc3_mdl::load(dir.path().join("missing.mdl")).unwrap_err();
    assert!(matches!(err, wc3_mdl::MdlError::Io(_)));
}
