//! `tree` command

use std::path::Path;

use anyhow::Result;
use wc3_mdl::chunks::{NodeKind, TextureSource};
use wc3_mdl::{AnimTrack, Document, TrackValue};

use crate::utils::{NodeType, TreeNode, TreeOptions, render_tree};

pub fn execute(path: &Path, depth: usize, no_color: bool, compact: bool, strict: bool) -> Result<()> {
    let doc = super::load_model(path, strict)?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let options = TreeOptions {
        max_depth: Some(depth),
        no_color,
        compact,
        ..TreeOptions::default()
    };
    print!("{}", render_tree(&build_tree(&doc, &file_name), &options));
    Ok(())
}

fn track_node<T: TrackValue>(name: &str, track: &AnimTrack<T>) -> TreeNode {
    let mut node = TreeNode::new(name, NodeType::Track)
        .with_metadata("keys", track.key_count())
        .with_metadata("interpolation", track.interpolation);
    if let Some(global) = track.global_sequence {
        node = node.with_metadata("global_sequence", global);
    }
    node
}

fn section(name: &str, count: usize) -> TreeNode {
    TreeNode::new(format!("{name} ({count})"), NodeType::Section)
}

/// Node hierarchy below `parent`, following parent links
fn node_children(doc: &Document, parent: Option<usize>, keywords: &[&str]) -> Vec<TreeNode> {
    doc.children_of(parent)
        .map(|(index, node)| {
            let mut entry = TreeNode::new(
                format!("{} \"{}\"", keywords[index], node.name()),
                NodeType::Entry,
            );
            match &node.kind {
                NodeKind::Attachment(attachment) => {
                    if let Some(path) = &attachment.path {
                        entry = entry.with_external_ref(path);
                    }
                }
                NodeKind::ParticleEmitter(emitter) if !emitter.path.is_empty() => {
                    entry = entry.with_external_ref(&emitter.path);
                }
                NodeKind::EventObject(event) => {
                    entry = entry.with_metadata("events", event.track.times.len());
                }
                _ => {}
            }
            let header = &node.header;
            if let Some(track) = &header.translation {
                entry = entry.add_child(track_node("Translation", track));
            }
            if let Some(track) = &header.rotation {
                entry = entry.add_child(track_node("Rotation", track));
            }
            if let Some(track) = &header.scaling {
                entry = entry.add_child(track_node("Scaling", track));
            }
            if let Some(track) = &header.visibility {
                entry = entry.add_child(track_node("Visibility", track));
            }
            for child in node_children(doc, Some(index), keywords) {
                entry = entry.add_child(child);
            }
            entry
        })
        .collect()
}

fn build_tree(doc: &Document, file_name: &str) -> TreeNode {
    let mut root = TreeNode::new(file_name, NodeType::Root)
        .with_metadata("name", &doc.name)
        .with_metadata("version", doc.version)
        .add_child(
            TreeNode::new("Model", NodeType::Header)
                .with_metadata("blend_time", doc.blend_time)
                .with_metadata("bounds_radius", format!("{:.3}", doc.extent.radius)),
        );

    if !doc.sequences.is_empty() {
        let mut sequences = section("Sequences", doc.sequences.len());
        for seq in &doc.sequences {
            sequences = sequences.add_child(
                TreeNode::new(format!("Anim \"{}\"", seq.name), NodeType::Entry)
                    .with_metadata("interval", format!("{}-{}", seq.start, seq.end))
                    .with_metadata("looping", !seq.non_looping),
            );
        }
        root = root.add_child(sequences);
    }

    if !doc.global_sequences.is_empty() {
        let mut globals = section("GlobalSequences", doc.global_sequences.len());
        for (i, duration) in doc.global_sequences.iter().enumerate() {
            globals = globals.add_child(
                TreeNode::new(format!("GlobalSequence {i}"), NodeType::Entry)
                    .with_metadata("duration", duration),
            );
        }
        root = root.add_child(globals);
    }

    if !doc.textures.is_empty() {
        let mut textures = section("Textures", doc.textures.len());
        for (i, texture) in doc.textures.iter().enumerate() {
            let entry = TreeNode::new(format!("Texture {i}"), NodeType::Entry);
            textures = textures.add_child(match &texture.source {
                TextureSource::Image(path) => entry.with_external_ref(path),
                TextureSource::Replaceable(id) => {
                    entry.with_external_ref(&format!("ReplaceableId {id}"))
                }
            });
        }
        root = root.add_child(textures);
    }

    if !doc.materials.is_empty() {
        let mut materials = section("Materials", doc.materials.len());
        for (i, material) in doc.materials.iter().enumerate() {
            let mut entry = TreeNode::new(format!("Material {i}"), NodeType::Entry)
                .with_metadata("priority_plane", material.priority_plane);
            for (j, layer) in material.layers.iter().enumerate() {
                entry = entry.add_child(
                    TreeNode::new(format!("Layer {j}"), NodeType::Entry)
                        .with_metadata("filter", layer.filter_mode),
                );
            }
            materials = materials.add_child(entry);
        }
        root = root.add_child(materials);
    }

    if !doc.geosets.is_empty() {
        let mut geosets = section("Geosets", doc.geosets.len());
        for (i, geoset) in doc.geosets.iter().enumerate() {
            let mut entry = TreeNode::new(format!("Geoset {i}"), NodeType::Entry)
                .with_metadata("vertices", geoset.vertices.len())
                .with_metadata("triangles", geoset.triangle_count())
                .with_metadata("material", geoset.material);
            if let Some(anim) = doc.geoset_anim_for(i) {
                entry = entry.with_metadata("geoset_anim", anim);
            }
            geosets = geosets.add_child(entry);
        }
        root = root.add_child(geosets);
    }

    if !doc.nodes.is_empty() {
        let keywords = doc.node_keywords();
        let mut nodes = section("Nodes", doc.nodes.len());
        for child in node_children(doc, None, &keywords) {
            nodes = nodes.add_child(child);
        }
        root = root.add_child(nodes);
    }

    if !doc.cameras.is_empty() {
        let mut cameras = section("Cameras", doc.cameras.len());
        for camera in &doc.cameras {
            cameras = cameras.add_child(
                TreeNode::new(format!("Camera \"{}\"", camera.name), NodeType::Entry)
                    .with_metadata("field_of_view", camera.field_of_view),
            );
        }
        root = root.add_child(cameras);
    }

    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use wc3_mdl::chunks::{Node, Sequence, Texture};

    #[test]
    fn test_build_tree_nests_children() {
        let mut doc = Document::new("Tree");
        doc.sequences.push(Sequence::new("Stand", 0, 1000));
        doc.textures.push(Texture::image("Textures\\Tree.blp"));
        doc.nodes.push(Node::helper("Trunk"));
        let mut branch = Node::helper("Branch");
        branch.header.parent = Some(0);
        doc.nodes.push(branch);

        let tree = build_tree(&doc, "Tree.mdl");
        let options = TreeOptions {
            no_color: true,
            compact: true,
            ..TreeOptions::default()
        };
        let output = render_tree(&tree, &options);
        assert!(output.contains("Anim \"Stand\" [interval:0-1000, looping:true]"));
        assert!(output.contains("Tree.blp"));
        assert!(output.contains("└── 🏷️ Helper \"Trunk\"\n"));
        assert!(output.contains("    └── 🏷️ Helper \"Branch\"\n"));
    }
}
