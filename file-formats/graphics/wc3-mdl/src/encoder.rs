//! [`Document`] to text.
//!
//! Output order is fixed: header comment, `Version`, `Model`, `Sequences`,
//! `GlobalSequences`, `Textures`, `Materials`, `TextureAnims`, geosets,
//! geoset animations, then nodes grouped by kind with the `PivotPoints`
//! table and the cameras slotted between the groups.

use log::{debug, info};

use crate::chunks::write_extent;
use crate::document::Document;
use crate::error::Result;
use crate::validator::Validator;
use crate::writer::{MdlWriter, format_vector};

/// Encoder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Written as `// ...` lines at the top of the file
    pub header_comment: Option<String>,
    /// Check model invariants before writing. References are always checked.
    pub validate: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            header_comment: None,
            validate: true,
        }
    }
}

/// Top-level node groups in output order. `PivotPoints` and `Camera` are not
/// node kinds but sit between them.
const NODE_SECTIONS: [&str; 11] = [
    "Bone",
    "Light",
    "Helper",
    "Attachment",
    "PivotPoints",
    "ParticleEmitter",
    "ParticleEmitter2",
    "RibbonEmitter",
    "Camera",
    "EventObject",
    "CollisionShape",
];

/// `Num*` header statements and the node keyword each counts
const NODE_COUNTS: [(&str, &str); 9] = [
    ("NumBones", "Bone"),
    ("NumLights", "Light"),
    ("NumHelpers", "Helper"),
    ("NumAttachments", "Attachment"),
    ("NumParticleEmitters", "ParticleEmitter"),
    ("NumParticleEmitters2", "ParticleEmitter2"),
    ("NumRibbonEmitters", "RibbonEmitter"),
    ("NumEvents", "EventObject"),
    ("NumCollisionShapes", "CollisionShape"),
];

/// Encode with default options
pub fn encode(doc: &Document) -> Result<String> {
    encode_with(doc, &EncodeOptions::default())
}

/// Encode a document as MDL text. Fails on a dangling reference, or with
/// `validate` on any model invariant violation.
pub fn encode_with(doc: &Document, options: &EncodeOptions) -> Result<String> {
    let report = Validator::new().validate(doc);
    if let Some(error) = report
        .errors
        .iter()
        .find(|e| options.validate || e.is_reference())
    {
        return Err(error.to_mdl_error());
    }
    for warning in &report.warnings {
        debug!("{warning}");
    }

    let vertex_count: usize = doc.geosets.iter().map(|g| g.vertices.len()).sum();
    let mut w = MdlWriter::with_capacity(4096 + vertex_count * 128);
    Encoder {
        doc,
        keywords: doc.node_keywords(),
        order: doc.encode_order(),
        object_ids: doc.object_ids(),
    }
    .write(&mut w, options);

    info!(
        "Encoded \"{}\": {} geosets, {} nodes",
        doc.name,
        doc.geosets.len(),
        doc.nodes.len()
    );
    Ok(w.finish())
}

struct Encoder<'a> {
    doc: &'a Document,
    /// Keyword per node index
    keywords: Vec<&'static str>,
    /// Node indices in object id order
    order: Vec<usize>,
    /// Object id per node index
    object_ids: Vec<usize>,
}

impl Encoder<'_> {
    fn write(&self, w: &mut MdlWriter, options: &EncodeOptions) {
        let doc = self.doc;

        if let Some(comment) = &options.header_comment {
            w.comment(comment);
        }

        w.open("Version");
        w.int("FormatVersion", doc.version);
        w.close();

        self.write_model(w);

        w.open(format!("Sequences {}", doc.sequences.len()));
        for sequence in &doc.sequences {
            sequence.write(w);
        }
        w.close();

        if !doc.global_sequences.is_empty() {
            w.open(format!("GlobalSequences {}", doc.global_sequences.len()));
            for duration in &doc.global_sequences {
                w.int("Duration", duration);
            }
            w.close();
        }

        if !doc.textures.is_empty() {
            w.open(format!("Textures {}", doc.textures.len()));
            for texture in &doc.textures {
                texture.write(w);
            }
            w.close();
        }

        if !doc.materials.is_empty() {
            w.open(format!("Materials {}", doc.materials.len()));
            for material in &doc.materials {
                material.write(w);
            }
            w.close();
        }

        if !doc.texture_anims.is_empty() {
            w.open(format!("TextureAnims {}", doc.texture_anims.len()));
            for anim in &doc.texture_anims {
                anim.write(w);
            }
            w.close();
        }

        for geoset in &doc.geosets {
            geoset.write(w, doc.sequences.len(), &self.object_ids);
        }
        debug!("Wrote {} geosets", doc.geosets.len());

        for anim in &doc.geoset_anims {
            anim.write(w);
        }

        for section in NODE_SECTIONS {
            match section {
                "PivotPoints" => self.write_pivots(w),
                "Camera" => {
                    for camera in &doc.cameras {
                        camera.write(w);
                    }
                }
                keyword => self.write_nodes(w, keyword),
            }
        }
    }

    fn write_model(&self, w: &mut MdlWriter) {
        let doc = self.doc;
        w.open(format!("Model \"{}\"", doc.name));
        if !doc.geosets.is_empty() {
            w.int("NumGeosets", doc.geosets.len());
        }
        if !doc.geoset_anims.is_empty() {
            w.int("NumGeosetAnims", doc.geoset_anims.len());
        }
        for (statement, keyword) in NODE_COUNTS {
            let count = self.keywords.iter().filter(|k| **k == keyword).count();
            if count > 0 {
                w.int(statement, count);
            }
        }
        w.int("BlendTime", doc.blend_time);
        write_extent(w, &doc.extent);
        w.close();
    }

    fn write_nodes(&self, w: &mut MdlWriter, keyword: &str) {
        let mut written = 0;
        for &index in &self.order {
            if self.keywords[index] != keyword {
                continue;
            }
            let node = &self.doc.nodes[index];
            let parent = node.header.parent.map(|p| self.object_ids[p]);
            node.write(w, keyword, self.object_ids[index], parent);
            written += 1;
        }
        if written > 0 {
            debug!("Wrote {written} {keyword} nodes");
        }
    }

    fn write_pivots(&self, w: &mut MdlWriter) {
        if self.order.is_empty() {
            return;
        }
        w.open(format!("PivotPoints {}", self.order.len()));
        for &index in &self.order {
            w.field(format_vector(&self.doc.nodes[index].header.pivot.to_array()));
        }
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{Geoset, Node, Sequence, Vertex};
    use crate::error::MdlError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_model() {
        let mut doc = Document::new("E");
        doc.sequences.push(Sequence::new("Stand", 0, 3333));
        let text = encode(&doc).unwrap();
        assert_eq!(
            text,
            "Version {
	FormatVersion 800,
}
Model \"E\" {
	BlendTime 150,
	MinimumExtent { 0, 0, 0 },
	MaximumExtent { 0, 0, 0 },
	BoundsRadius 0,
}
Sequences 1 {
	Anim \"Stand\" {
		Interval { 0, 3333 },
		MinimumExtent { 0, 0, 0 },
		MaximumExtent { 0, 0, 0 },
		BoundsRadius 0,
	}
}
"
        );
    }

    #[test]
    fn test_header_comment() {
        let options = EncodeOptions {
            header_comment: Some("Exported 2024-01-01".to_string()),
            ..EncodeOptions::default()
        };
        let text = encode_with(&Document::new("E"), &options).unwrap();
        assert!(text.starts_with("// Exported 2024-01-01\nVersion {\n"));
    }

    #[test]
    fn test_node_sections_and_pivots() {
        let mut doc = Document::new("Nodes");
        doc.nodes.push(Node::helper("Root"));
        doc.nodes.push(Node::bone("Arm"));
        doc.nodes[1].header.parent = Some(0);
        doc.nodes[1].header.pivot = glam::Vec3::new(0.0, 0.0, 5.0);
        doc.geosets.push(Geoset {
            vertices: vec![Vertex::default()],
            matrix_groups: vec![vec![1]],
            ..Geoset::default()
        });
        doc.materials.push(crate::chunks::Material::with_layer(
            crate::chunks::Layer::default(),
        ));
        doc.textures.push(crate::chunks::Texture::image(""));

        let text = encode(&doc).unwrap();
        let bone = text.find("Bone \"Arm\" {\n\tObjectId 0,\n").unwrap();
        let helper = text.find("Helper \"Root\" {\n\tObjectId 1,\n").unwrap();
        let pivots = text
            .find("PivotPoints 2 {\n\t{ 0, 0, 5 },\n\t{ 0, 0, 0 },\n}\n")
            .unwrap();
        assert!(bone < helper && helper < pivots);
        assert!(text.contains("\tParent 1,\n"));
        assert!(text.contains("\t\tMatrices { 0 },\n"));
        assert!(text.contains("\tNumBones 1,\n\tNumHelpers 1,\n"));
    }

    #[test]
    fn test_invariant_violation() {
        let mut doc = Document::new("Bad");
        doc.sequences.push(Sequence::new("Reversed", 100, 0));
        assert!(matches!(encode(&doc).unwrap_err(), MdlError::Invariant(_)));

        let lenient = EncodeOptions {
            validate: false,
            ..EncodeOptions::default()
        };
        assert!(encode_with(&doc, &lenient).is_ok());
    }

    #[test]
    fn test_references_checked_without_validation() {
        let mut doc = Document::new("Bad");
        doc.geosets.push(Geoset::default());
        let lenient = EncodeOptions {
            validate: false,
            ..EncodeOptions::default()
        };
        assert!(matches!(
            encode_with(&doc, &lenient).unwrap_err(),
            MdlError::Reference { .. }
        ));
    }

    #[test]
    fn test_deterministic() {
        let mut doc = Document::new("D");
        doc.sequences.push(Sequence::new("Stand", 0, 1000));
        doc.global_sequences.push(2000);
        assert_eq!(encode(&doc).unwrap(), encode(&doc).unwrap());
    }
}
