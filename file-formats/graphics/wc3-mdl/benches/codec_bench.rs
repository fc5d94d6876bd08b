use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use glam::{Quat, Vec2, Vec3};
use std::hint::black_box;
use wc3_mdl::chunks::{FilterMode, Geoset, Layer, Material, Node, Sequence, Texture, Vertex};
use wc3_mdl::{AnimTrack, Document, decode, encode, optimize};

/// A grid mesh of `size * size` vertices skinned to one bone, with a
/// densely keyed animation
fn create_test_model(size: u32) -> Document {
    let mut doc = Document::new("Bench");
    doc.sequences.push(Sequence::new("Stand", 0, 10_000));
    doc.textures.push(Texture::image("Textures\\Bench.blp"));
    doc.materials
        .push(Material::with_layer(Layer::new(FilterMode::None, 0)));

    let mut bone = Node::bone("Root");
    bone.header.translation = Some(AnimTrack::linear(
        (0..=100u32).map(|i| (i * 100, Vec3::new(0.0, 0.0, (i as f32 * 0.1).sin()))),
    ));
    bone.header.rotation = Some(AnimTrack::linear(
        (0..=100u32).map(|i| (i * 100, Quat::from_rotation_z(i as f32 * 0.05))),
    ));
    doc.nodes.push(bone);

    let mut geoset = Geoset {
        matrix_groups: vec![vec![0]],
        ..Geoset::default()
    };
    for y in 0..size {
        for x in 0..size {
            geoset.vertices.push(Vertex {
                position: Vec3::new(x as f32, y as f32, 0.0),
                normal: Vec3::Z,
                uv: Vec2::new(x as f32 / size as f32, y as f32 / size as f32),
                group: 0,
            });
        }
    }
    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let i = y * size + x;
            geoset
                .triangles
                .extend_from_slice(&[i, i + 1, i + size, i + size, i + 1, i + size + 1]);
        }
    }
    doc.geosets.push(geoset);
    doc.compute_extents();
    doc
}

fn codec_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for size in [16, 64] {
        let doc = create_test_model(size);
        let text = encode(&doc).unwrap();
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &doc, |b, doc| {
            b.iter(|| encode(black_box(doc)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("decode", size), &text, |b, text| {
            b.iter(|| decode(black_box(text.as_bytes())).unwrap())
        });
    }
    group.finish();
}

fn optimize_benchmark(c: &mut Criterion) {
    let doc = create_test_model(2);
    c.bench_function("optimize", |b| {
        b.iter(|| {
            let mut doc = doc.clone();
            black_box(optimize(&mut doc, 1e-4))
        })
    });
}

criterion_group!(benches, codec_benchmark, optimize_benchmark);
criterion_main!(benches);
