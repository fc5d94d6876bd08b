//! `info` command

use std::path::Path;

use anyhow::Result;
use wc3_mdl::Document;
use wc3_mdl::chunks::{NodeKind, TextureSource};

use crate::utils::{add_table_row, create_table, format_bytes, format_millis};

pub fn execute(path: &Path, detailed: bool, strict: bool) -> Result<()> {
    let doc = super::load_model(path, strict)?;
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    println!("MDL Model Information");
    println!("=====================");
    println!();
    println!("File: {} ({})", path.display(), format_bytes(size));
    println!("Name: {}", doc.name);
    println!("Format version: {}", doc.version);
    println!("Blend time: {} ms", doc.blend_time);
    println!(
        "Extent: min {}, max {}, radius {:.3}",
        doc.extent.min, doc.extent.max, doc.extent.radius
    );
    println!();

    print_counts(&doc);

    if detailed {
        print_sequences(&doc);
        print_textures(&doc);
        print_nodes(&doc);
    }

    Ok(())
}

fn print_counts(doc: &Document) {
    let count = |pred: &dyn Fn(&NodeKind) -> bool| doc.nodes.iter().filter(|n| pred(&n.kind)).count();
    let vertices: usize = doc.geosets.iter().map(|g| g.vertices.len()).sum();
    let triangles: usize = doc.geosets.iter().map(|g| g.triangle_count()).sum();

    let rows = [
        ("Sequences", doc.sequences.len()),
        ("Global sequences", doc.global_sequences.len()),
        ("Textures", doc.textures.len()),
        ("Materials", doc.materials.len()),
        ("Texture animations", doc.texture_anims.len()),
        ("Geosets", doc.geosets.len()),
        ("Vertices", vertices),
        ("Triangles", triangles),
        ("Geoset animations", doc.geoset_anims.len()),
        ("Bones", count(&|k| matches!(k, NodeKind::Bone(_)))),
        ("Lights", count(&|k| matches!(k, NodeKind::Light(_)))),
        ("Helpers", count(&|k| matches!(k, NodeKind::Helper))),
        ("Attachments", count(&|k| matches!(k, NodeKind::Attachment(_)))),
        (
            "Particle emitters",
            count(&|k| {
                matches!(
                    k,
                    NodeKind::ParticleEmitter(_) | NodeKind::ParticleEmitter2(_)
                )
            }),
        ),
        ("Ribbon emitters", count(&|k| matches!(k, NodeKind::RibbonEmitter(_)))),
        ("Event objects", count(&|k| matches!(k, NodeKind::EventObject(_)))),
        ("Collision shapes", count(&|k| matches!(k, NodeKind::CollisionShape(_)))),
        ("Cameras", doc.cameras.len()),
        ("Keyframes", doc.key_count()),
    ];

    let mut table = create_table(vec!["Component", "Count"]);
    for (name, value) in rows {
        add_table_row(&mut table, vec![name.to_string(), value.to_string()]);
    }
    table.printstd();
}

fn print_sequences(doc: &Document) {
    if doc.sequences.is_empty() {
        return;
    }
    println!("\nSequences:");
    let mut table = create_table(vec!["#", "Name", "Interval", "Length", "Looping", "Rarity"]);
    for (i, seq) in doc.sequences.iter().enumerate() {
        add_table_row(
            &mut table,
            vec![
                i.to_string(),
                seq.name.clone(),
                format!("{} - {}", seq.start, seq.end),
                format_millis(seq.duration()),
                if seq.non_looping { "no" } else { "yes" }.to_string(),
                seq.rarity.to_string(),
            ],
        );
    }
    table.printstd();
}

fn print_textures(doc: &Document) {
    if doc.textures.is_empty() {
        return;
    }
    println!("\nTextures:");
    let mut table = create_table(vec!["#", "Source"]);
    for (i, texture) in doc.textures.iter().enumerate() {
        let source = match &texture.source {
            TextureSource::Image(path) => path.clone(),
            TextureSource::Replaceable(id) => format!("Replaceable #{id}"),
        };
        add_table_row(&mut table, vec![i.to_string(), source]);
    }
    table.printstd();
}

fn print_nodes(doc: &Document) {
    if doc.nodes.is_empty() {
        return;
    }
    println!("\nNodes:");
    let keywords = doc.node_keywords();
    let ids = doc.object_ids();
    let mut table = create_table(vec!["ObjectId", "Type", "Name", "Parent"]);
    for (i, node) in doc.nodes.iter().enumerate() {
        let parent = node
            .header
            .parent
            .and_then(|p| doc.nodes.get(p))
            .map_or_else(|| "-".to_string(), |p| p.name().to_string());
        add_table_row(
            &mut table,
            vec![
                ids[i].to_string(),
                keywords[i].to_string(),
                node.name().to_string(),
                parent,
            ],
        );
    }
    table.printstd();
}
