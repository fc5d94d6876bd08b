//! Text to [`Document`].
//!
//! The top-level loop reads one chunk at a time from the [`BlockParser`] and
//! dispatches on its keyword. Nodes are collected with the object ids found
//! in the file and resolved once every chunk has been read: parents, matrix
//! groups and pivots are rewritten from object ids to node indices, and the
//! nodes are stored in canonical object id order.

use std::collections::HashMap;

use glam::Vec3;
use log::{debug, info, warn};

use crate::block::{BlockParser, Item};
use crate::chunks::node::RawNode;
use crate::chunks::{
    Camera, ExtentReader, Geoset, GeosetAnim, Material, Node, NodeKind, Sequence, Texture,
    TextureAnim, skip_unknown,
};
use crate::document::{Document, FORMAT_VERSION};
use crate::error::{MdlError, Position, Result};
use crate::geometry::vec3;
use crate::validator::Validator;

/// Decoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Reject any `FormatVersion` other than 800 instead of warning
    pub strict_version: bool,
    /// Skip unknown top-level chunks with a warning instead of failing
    pub skip_unknown_chunks: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            strict_version: false,
            skip_unknown_chunks: true,
        }
    }
}

/// Decode MDL text with default options
pub fn decode(input: &[u8]) -> Result<Document> {
    decode_with(input, &DecodeOptions::default())
}

/// Decode MDL text
pub fn decode_with(input: &[u8], options: &DecodeOptions) -> Result<Document> {
    let mut parser = BlockParser::new(input)?;
    let mut decoder = Decoder::new(options);

    while let Some(item) = parser.read_item()? {
        debug_assert_eq!(parser.depth(), 0);
        decoder.chunk(&item)?;
    }
    // `read_item` stops at a stray closing brace
    parser.expect_end()?;

    decoder.finish()
}

struct Decoder<'a> {
    options: &'a DecodeOptions,
    doc: Document,
    raw_nodes: Vec<RawNode>,
    pivots: Vec<Vec3>,
    declared_counts: Vec<(String, usize, Position)>,
}

impl<'a> Decoder<'a> {
    fn new(options: &'a DecodeOptions) -> Self {
        Self {
            options,
            doc: Document::default(),
            raw_nodes: Vec::new(),
            pivots: Vec::new(),
            declared_counts: Vec::new(),
        }
    }

    fn chunk(&mut self, item: &Item) -> Result<()> {
        let Some(keyword) = item.keyword() else {
            return Err(MdlError::structural(
                item.pos,
                "a chunk keyword",
                item.head.to_string(),
            ));
        };

        if let Some(kind) = NodeKind::from_keyword(keyword) {
            self.raw_nodes.push(Node::parse(item, kind)?);
            return Ok(());
        }

        match keyword {
            "Version" => self.version(item)?,
            "Model" => self.model(item)?,
            "Sequences" => {
                for anim in item.declared_children("Anim")? {
                    self.doc.sequences.push(Sequence::parse(anim)?);
                }
            }
            "GlobalSequences" => {
                for duration in item.declared_children("Duration")? {
                    self.doc.global_sequences.push(duration.arg_u32(0)?);
                }
            }
            "Textures" => {
                for bitmap in item.declared_children("Bitmap")? {
                    self.doc.textures.push(Texture::parse(bitmap)?);
                }
            }
            "Materials" => {
                for material in item.declared_children("Material")? {
                    self.doc.materials.push(Material::parse(material)?);
                }
            }
            "TextureAnims" => {
                for anim in item.declared_children("TVertexAnim")? {
                    self.doc.texture_anims.push(TextureAnim::parse(anim)?);
                }
            }
            "PivotPoints" => {
                let declared = item.arg_usize(0)?;
                let points = item.vector_children::<3>()?;
                if points.len() != declared {
                    return Err(MdlError::count_mismatch(
                        item.pos,
                        "PivotPoints",
                        declared,
                        points.len(),
                    ));
                }
                self.pivots.extend(points.into_iter().map(vec3));
            }
            "Geoset" => self.doc.geosets.push(Geoset::parse(item)?),
            "GeosetAnim" => self.doc.geoset_anims.push(GeosetAnim::parse(item)?),
            "Camera" => self.doc.cameras.push(Camera::parse(item)?),
            _ if self.options.skip_unknown_chunks => skip_unknown("Model file", item),
            other => {
                return Err(MdlError::structural(
                    item.pos,
                    "a known chunk keyword",
                    format!("'{other}'"),
                ));
            }
        }
        Ok(())
    }

    fn version(&mut self, item: &Item) -> Result<()> {
        for child in item.children()? {
            if !child.is("FormatVersion") {
                skip_unknown("Version", child);
                continue;
            }
            let version = child.arg_u32(0)?;
            if version != FORMAT_VERSION {
                if self.options.strict_version {
                    return Err(MdlError::structural(
                        child.pos,
                        format!("FormatVersion {FORMAT_VERSION}"),
                        format!("FormatVersion {version}"),
                    ));
                }
                warn!("Unexpected FormatVersion {version}, decoding as {FORMAT_VERSION}");
            }
            self.doc.version = version;
        }
        Ok(())
    }

    fn model(&mut self, item: &Item) -> Result<()> {
        self.doc.name = item.arg_str(0)?.to_string();
        let mut extent = ExtentReader::default();
        for child in item.children()? {
            if extent.read(child)? {
                continue;
            }
            match child.keyword() {
                Some("BlendTime") => self.doc.blend_time = child.arg_u32(0)?,
                Some(count) if count.starts_with("Num") => {
                    self.declared_counts
                        .push((count[3..].to_string(), child.arg_usize(0)?, child.pos));
                }
                _ => skip_unknown("Model", child),
            }
        }
        self.doc.extent = extent.finish().unwrap_or_default();
        debug!("Model \"{}\"", self.doc.name);
        Ok(())
    }

    fn finish(mut self) -> Result<Document> {
        self.resolve_nodes()?;
        self.check_declared_counts();

        // Geosets without one `Anim` block per sequence use their own extent
        let sequence_count = self.doc.sequences.len();
        for geoset in &mut self.doc.geosets {
            if geoset.sequence_extents.len() != sequence_count {
                geoset.sequence_extents = vec![geoset.extent; sequence_count];
            }
        }

        let report = Validator::new().validate(&self.doc);
        if let Some(error) = report.reference_errors().next() {
            return Err(error.to_mdl_error());
        }

        let changed = self.doc.reclassify_bones();
        if changed > 0 {
            debug!("{changed} nodes reclassified between Bone and Helper");
        }
        // Reclassification can move nodes between kind groups
        reorder_nodes(&mut self.doc);

        info!(
            "Decoded \"{}\": {} sequences, {} geosets, {} nodes",
            self.doc.name,
            self.doc.sequences.len(),
            self.doc.geosets.len(),
            self.doc.nodes.len()
        );
        Ok(self.doc)
    }

    /// Turn object ids into node indices
    fn resolve_nodes(&mut self) -> Result<()> {
        let mut raw_nodes = std::mem::take(&mut self.raw_nodes);

        let mut by_id: HashMap<usize, usize> = HashMap::with_capacity(raw_nodes.len());
        for (index, raw) in raw_nodes.iter().enumerate() {
            let Some(id) = raw.object_id else {
                return Err(MdlError::structural(
                    raw.pos,
                    format!("'ObjectId' in {} \"{}\"", raw.node.kind, raw.node.name()),
                    "'}'",
                ));
            };
            if by_id.insert(id, index).is_some() {
                return Err(MdlError::structural(
                    raw.pos,
                    "a unique ObjectId",
                    format!("duplicate ObjectId {id}"),
                ));
            }
        }

        if !self.pivots.is_empty() && self.pivots.len() != raw_nodes.len() {
            warn!(
                "{} pivot points for {} nodes",
                self.pivots.len(),
                raw_nodes.len()
            );
        }

        // Node order: kind group first, then the object id from the file
        raw_nodes.sort_by_key(|raw| (raw.node.kind.rank(), raw.object_id));
        let index_of: HashMap<usize, usize> = raw_nodes
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| raw.object_id.map(|id| (id, index)))
            .collect();
        let count = raw_nodes.len();
        let resolve = |field: String, id: usize| {
            index_of
                .get(&id)
                .copied()
                .ok_or_else(|| MdlError::reference(field, id, count))
        };

        let mut nodes = Vec::with_capacity(count);
        for raw in raw_nodes {
            let mut node = raw.node;
            if let Some(parent) = raw.parent_id {
                node.header.parent =
                    Some(resolve(format!("{} \"{}\" Parent", node.kind, node.name()), parent)?);
            }
            if let Some(id) = raw.object_id
                && let Some(pivot) = self.pivots.get(id)
            {
                node.header.pivot = *pivot;
            }
            nodes.push(node);
        }

        for (g, geoset) in self.doc.geosets.iter_mut().enumerate() {
            for group in &mut geoset.matrix_groups {
                for entry in group.iter_mut() {
                    *entry = resolve(format!("geosets[{g}] Matrices"), *entry)?;
                }
            }
        }

        self.doc.nodes = nodes;
        Ok(())
    }

    /// `Num*` statements in the `Model` header are informational
    fn check_declared_counts(&self) {
        let doc = &self.doc;
        let count_nodes =
            |keyword: &str| doc.nodes.iter().filter(|n| n.kind.keyword() == keyword).count();
        for (name, declared, pos) in &self.declared_counts {
            let actual = match name.as_str() {
                "Geosets" => doc.geosets.len(),
                "GeosetAnims" => doc.geoset_anims.len(),
                "Bones" => count_nodes("Bone"),
                "Helpers" => count_nodes("Helper"),
                "Lights" => count_nodes("Light"),
                "Attachments" => count_nodes("Attachment"),
                "ParticleEmitters" => count_nodes("ParticleEmitter"),
                "ParticleEmitters2" => count_nodes("ParticleEmitter2"),
                "RibbonEmitters" => count_nodes("RibbonEmitter"),
                "Events" => count_nodes("EventObject"),
                "CollisionShapes" => count_nodes("CollisionShape"),
                "Cameras" => doc.cameras.len(),
                _ => continue,
            };
            if actual != *declared {
                warn!("Num{name} at {pos} declares {declared}, found {actual}");
            }
        }
    }
}

/// Stable sort of nodes into object id order, with every index remapped
fn reorder_nodes(doc: &mut Document) {
    let order = doc.encode_order();
    if order.iter().enumerate().all(|(i, &o)| i == o) {
        return;
    }
    let mut new_index = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        new_index[old] = new;
    }

    let mut slots: Vec<Option<Node>> = std::mem::take(&mut doc.nodes).into_iter().map(Some).collect();
    doc.nodes = order
        .iter()
        .filter_map(|&old| slots[old].take())
        .collect();
    for node in &mut doc.nodes {
        node.header.parent = node.header.parent.map(|p| new_index[p]);
    }
    for geoset in &mut doc.geosets {
        for entry in geoset.matrix_groups.iter_mut().flatten() {
            *entry = new_index[*entry];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HIERARCHY: &str = r#"
Version {
	FormatVersion 800,
}
Model "Hierarchy" {
	NumBones 1,
	NumHelpers 1,
	BlendTime 150,
}
Helper "Root" {
	ObjectId 1,
}
Bone "Arm" {
	ObjectId 0,
	Parent 1,
	GeosetId 0,
	GeosetAnimId None,
}
Geoset {
	Vertices 1 {
		{ 0, 0, 0 },
	}
	Normals 1 {
		{ 0, 0, 1 },
	}
	TVertices 1 {
		{ 0, 0 },
	}
	VertexGroup {
		0,
	}
	Faces 1 0 {
		Triangles {
		}
	}
	Groups 1 1 {
		Matrices { 0 },
	}
	MaterialID 0,
}
Materials 1 {
	Material {
		Layer {
			FilterMode None,
			static TextureID 0,
		}
	}
}
Textures 1 {
	Bitmap {
		Image "Arm.blp",
	}
}
PivotPoints 2 {
	{ 1, 2, 3 },
	{ 4, 5, 6 },
}
"#;

    #[test]
    fn test_resolves_object_ids() {
        let doc = decode(HIERARCHY.as_bytes()).unwrap();
        assert_eq!(doc.name, "Hierarchy");
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].name(), "Arm");
        assert_eq!(doc.nodes[0].header.parent, Some(1));
        assert_eq!(doc.nodes[0].header.pivot, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(doc.nodes[1].name(), "Root");
        assert_eq!(doc.nodes[1].header.pivot, Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(doc.geosets[0].matrix_groups, vec![vec![0]]);
    }

    #[test]
    fn test_dangling_parent() {
        let src = HIERARCHY.replace("Parent 1,", "Parent 9,");
        let err = decode(src.as_bytes()).unwrap_err();
        assert!(matches!(err, MdlError::Reference { value: 9, .. }));
    }

    #[test]
    fn test_duplicate_object_id() {
        let src = HIERARCHY.replace("ObjectId 1,", "ObjectId 0,");
        let err = decode(src.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("duplicate ObjectId 0"));
    }

    #[test]
    fn test_strict_version() {
        let src = HIERARCHY.replace("FormatVersion 800", "FormatVersion 900");
        assert_eq!(decode(src.as_bytes()).unwrap().version, 900);

        let strict = DecodeOptions {
            strict_version: true,
            ..DecodeOptions::default()
        };
        assert!(matches!(
            decode_with(src.as_bytes(), &strict).unwrap_err(),
            MdlError::Structural { .. }
        ));
    }

    #[test]
    fn test_unknown_chunk() {
        let src = format!("{HIERARCHY}\nFaceFX \"x\" {{\n\tPath \"y\",\n}}\n");
        assert!(decode(src.as_bytes()).is_ok());

        let strict = DecodeOptions {
            skip_unknown_chunks: false,
            ..DecodeOptions::default()
        };
        let err = decode_with(src.as_bytes(), &strict).unwrap_err();
        assert!(err.to_string().contains("'FaceFX'"));
    }

    #[test]
    fn test_unskinned_bone_becomes_helper() {
        let src = HIERARCHY.replace("Matrices { 0 }", "Matrices { 1 }");
        let doc = decode(src.as_bytes()).unwrap();
        // Root now skins the vertex, Arm does not
        assert_eq!(doc.nodes[0].name(), "Root");
        assert!(matches!(doc.nodes[0].kind, NodeKind::Bone(_)));
        assert_eq!(doc.nodes[1].name(), "Arm");
        assert_eq!(doc.nodes[1].kind, NodeKind::Helper);
        assert_eq!(doc.nodes[1].header.parent, Some(0));
        assert_eq!(doc.geosets[0].matrix_groups, vec![vec![0]]);
    }

    #[test]
    fn test_unbalanced_braces() {
        let err = decode(b"Model \"x\" {\n\tBlendTime 150,\n").unwrap_err();
        assert!(matches!(err, MdlError::Structural { .. }));
        let err = decode(b"Model \"x\" {\n}\n}\n").unwrap_err();
        assert!(matches!(err, MdlError::Structural { .. }));
    }
}
