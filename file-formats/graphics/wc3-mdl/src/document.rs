//! The in-memory model: one [`Document`] per MDL file.
//!
//! Every cross reference is a plain index into one of the document's lists.
//! Node indices are independent of the object ids written to the file; the
//! encoder derives object ids from [`Document::object_ids`], and a decoded
//! document is always stored in that canonical order.

use glam::Vec3;
use log::debug;

use crate::chunks::{
    Bone, Camera, Geoset, GeosetAnim, Material, Node, NodeKind, Sequence, Texture, TextureAnim,
    object_rank,
};
use crate::geometry::Extent;
use crate::track::{AnimTrack, Animated, EventTrack, TrackValue};

/// The only format version written by the encoder
pub const FORMAT_VERSION: u32 = 800;

/// Default `BlendTime` of a new model, in milliseconds
pub const DEFAULT_BLEND_TIME: u32 = 150;

/// A complete MDL model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub name: String,
    pub version: u32,
    /// Milliseconds
    pub blend_time: u32,
    pub extent: Extent,
    pub sequences: Vec<Sequence>,
    /// Global sequence durations in milliseconds, referenced by index
    pub global_sequences: Vec<u32>,
    pub textures: Vec<Texture>,
    pub materials: Vec<Material>,
    pub texture_anims: Vec<TextureAnim>,
    pub geosets: Vec<Geoset>,
    pub geoset_anims: Vec<GeosetAnim>,
    pub nodes: Vec<Node>,
    pub cameras: Vec<Camera>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: FORMAT_VERSION,
            blend_time: DEFAULT_BLEND_TIME,
            extent: Extent::ZERO,
            sequences: Vec::new(),
            global_sequences: Vec::new(),
            textures: Vec::new(),
            materials: Vec::new(),
            texture_anims: Vec::new(),
            geosets: Vec::new(),
            geoset_anims: Vec::new(),
            nodes: Vec::new(),
            cameras: Vec::new(),
        }
    }

    /// Which nodes some geoset's matrix groups point at
    pub fn skinned_nodes(&self) -> Vec<bool> {
        let mut referenced = vec![false; self.nodes.len()];
        for node in self.geosets.iter().flat_map(Geoset::referenced_nodes) {
            if let Some(slot) = referenced.get_mut(node) {
                *slot = true;
            }
        }
        referenced
    }

    /// Keyword each node is written under. Bones no matrix group references
    /// become `Helper`; helpers that skin vertices become `Bone`.
    pub fn node_keywords(&self) -> Vec<&'static str> {
        let skinned = self.skinned_nodes();
        self.nodes
            .iter()
            .zip(skinned)
            .map(|(node, skinned)| match (&node.kind, skinned) {
                (NodeKind::Bone(_), false) => "Helper",
                (NodeKind::Helper, true) => "Bone",
                (kind, _) => kind.keyword(),
            })
            .collect()
    }

    /// Apply the bone/helper partition of [`Self::node_keywords`] to the
    /// node kinds. Returns how many nodes changed kind.
    pub fn reclassify_bones(&mut self) -> usize {
        let skinned = self.skinned_nodes();
        let mut changed = 0;
        for (node, skinned) in self.nodes.iter_mut().zip(skinned) {
            let kind = match (&node.kind, skinned) {
                (NodeKind::Bone(_), false) => NodeKind::Helper,
                (NodeKind::Helper, true) => NodeKind::Bone(Bone::default()),
                _ => continue,
            };
            debug!(
                "Reclassifying {} \"{}\" as {}",
                node.kind, node.header.name, kind
            );
            node.kind = kind;
            changed += 1;
        }
        changed
    }

    /// Node indices in object id order
    pub fn encode_order(&self) -> Vec<usize> {
        let keywords = self.node_keywords();
        let mut order: Vec<usize> = (0..self.nodes.len()).collect();
        order.sort_by_key(|&i| object_rank(keywords[i]));
        order
    }

    /// Object id of every node, by node index
    pub fn object_ids(&self) -> Vec<usize> {
        let mut ids = vec![0; self.nodes.len()];
        for (id, index) in self.encode_order().into_iter().enumerate() {
            ids[index] = id;
        }
        ids
    }

    /// Pivot of every node, in object id order
    pub fn pivot_points(&self) -> Vec<Vec3> {
        self.encode_order()
            .into_iter()
            .map(|i| self.nodes[i].header.pivot)
            .collect()
    }

    /// Index of an equal texture, adding it if there is none
    pub fn intern_texture(&mut self, texture: Texture) -> usize {
        intern(&mut self.textures, texture)
    }

    /// Index of an equal material, adding it if there is none
    pub fn intern_material(&mut self, material: Material) -> usize {
        intern(&mut self.materials, material)
    }

    /// Index of a global sequence with this duration, adding it if there is
    /// none
    pub fn intern_global_sequence(&mut self, duration: u32) -> usize {
        intern(&mut self.global_sequences, duration)
    }

    /// Recompute geoset extents from their vertices and the model extent as
    /// their union. Sequences without an extent of their own get the model
    /// extent.
    pub fn compute_extents(&mut self) {
        for geoset in &mut self.geosets {
            geoset.extent = geoset.compute_extent();
        }
        self.extent = self
            .geosets
            .iter()
            .map(|g| g.extent)
            .reduce(|a, b| a.union(&b))
            .unwrap_or(Extent::ZERO);
        for sequence in &mut self.sequences {
            if sequence.extent.is_zero() {
                sequence.extent = self.extent;
            }
        }
    }

    /// The geoset animation driving `geoset`, if any
    pub fn geoset_anim_for(&self, geoset: usize) -> Option<usize> {
        self.geoset_anims.iter().position(|a| a.geoset == geoset)
    }

    /// Direct children of `parent`, or the roots for `None`
    pub fn children_of(&self, parent: Option<usize>) -> impl Iterator<Item = (usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.header.parent == parent)
    }

    pub fn find_node(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.header.name == name)
    }

    /// Keyframes across every track in the model
    pub fn key_count(&self) -> usize {
        let mut counter = KeyCounter(0);
        self.visit_tracks(&mut counter);
        counter.0
    }

    /// Walk every animation track with a path naming where it lives
    pub fn visit_tracks<V: TrackVisitor>(&self, visitor: &mut V) {
        for (i, material) in self.materials.iter().enumerate() {
            for (j, layer) in material.layers.iter().enumerate() {
                let path = format!("materials[{i}].layers[{j}]");
                visit_animated(visitor, &path, "TextureID", &layer.texture_id);
                visit_animated(visitor, &path, "Alpha", &layer.alpha);
            }
        }
        for (i, anim) in self.texture_anims.iter().enumerate() {
            let path = format!("texture_anims[{i}]");
            visit_optional(visitor, &path, "Translation", anim.translation.as_ref());
            visit_optional(visitor, &path, "Rotation", anim.rotation.as_ref());
            visit_optional(visitor, &path, "Scaling", anim.scaling.as_ref());
        }
        for (i, anim) in self.geoset_anims.iter().enumerate() {
            let path = format!("geoset_anims[{i}]");
            visit_animated(visitor, &path, "Alpha", &anim.alpha);
            visit_animated(visitor, &path, "Color", &anim.color);
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let path = format!("nodes[{i}] \"{}\"", node.header.name);
            let header = &node.header;
            visit_optional(visitor, &path, "Translation", header.translation.as_ref());
            visit_optional(visitor, &path, "Rotation", header.rotation.as_ref());
            visit_optional(visitor, &path, "Scaling", header.scaling.as_ref());
            visit_optional(visitor, &path, "Visibility", header.visibility.as_ref());
            match &node.kind {
                NodeKind::Light(light) => {
                    visit_animated(visitor, &path, "AttenuationStart", &light.attenuation_start);
                    visit_animated(visitor, &path, "AttenuationEnd", &light.attenuation_end);
                    visit_animated(visitor, &path, "Color", &light.color);
                    visit_animated(visitor, &path, "Intensity", &light.intensity);
                    visit_animated(visitor, &path, "AmbColor", &light.ambient_color);
                    visit_animated(visitor, &path, "AmbIntensity", &light.ambient_intensity);
                }
                NodeKind::ParticleEmitter(emitter) => {
                    visit_animated(visitor, &path, "EmissionRate", &emitter.emission_rate);
                    visit_animated(visitor, &path, "Gravity", &emitter.gravity);
                    visit_animated(visitor, &path, "Longitude", &emitter.longitude);
                    visit_animated(visitor, &path, "Latitude", &emitter.latitude);
                    visit_animated(visitor, &path, "LifeSpan", &emitter.life_span);
                    visit_animated(visitor, &path, "InitVelocity", &emitter.init_velocity);
                }
                NodeKind::ParticleEmitter2(emitter) => {
                    visit_animated(visitor, &path, "Speed", &emitter.speed);
                    visit_animated(visitor, &path, "Variation", &emitter.variation);
                    visit_animated(visitor, &path, "Latitude", &emitter.latitude);
                    visit_animated(visitor, &path, "Gravity", &emitter.gravity);
                    visit_animated(visitor, &path, "EmissionRate", &emitter.emission_rate);
                    visit_animated(visitor, &path, "Width", &emitter.width);
                    visit_animated(visitor, &path, "Length", &emitter.height);
                }
                NodeKind::RibbonEmitter(emitter) => {
                    visit_animated(visitor, &path, "HeightAbove", &emitter.height_above);
                    visit_animated(visitor, &path, "HeightBelow", &emitter.height_below);
                    visit_animated(visitor, &path, "Alpha", &emitter.alpha);
                    visit_animated(visitor, &path, "Color", &emitter.color);
                    visit_animated(visitor, &path, "TextureSlot", &emitter.texture_slot);
                }
                NodeKind::EventObject(event) => {
                    visitor.visit_events(&format!("{path} EventTrack"), &event.track);
                }
                NodeKind::Bone(_)
                | NodeKind::Helper
                | NodeKind::Attachment(_)
                | NodeKind::CollisionShape(_) => {}
            }
        }
        for (i, camera) in self.cameras.iter().enumerate() {
            let path = format!("cameras[{i}] \"{}\"", camera.name);
            visit_optional(visitor, &path, "Translation", camera.translation.as_ref());
            visit_optional(visitor, &path, "Rotation", camera.rotation.as_ref());
            visit_optional(
                visitor,
                &path,
                "Target Translation",
                camera.target_translation.as_ref(),
            );
        }
    }
}

/// Callback for [`Document::visit_tracks`]
pub trait TrackVisitor {
    fn visit<T: TrackValue>(&mut self, path: &str, track: &AnimTrack<T>);

    fn visit_events(&mut self, _path: &str, _track: &EventTrack) {}
}

struct KeyCounter(usize);

impl TrackVisitor for KeyCounter {
    fn visit<T: TrackValue>(&mut self, _path: &str, track: &AnimTrack<T>) {
        self.0 += track.key_count();
    }

    fn visit_events(&mut self, _path: &str, track: &EventTrack) {
        self.0 += track.times.len();
    }
}

fn visit_animated<V: TrackVisitor, T: TrackValue>(
    visitor: &mut V,
    path: &str,
    name: &str,
    value: &Animated<T>,
) {
    if let Animated::Track(track) = value {
        visitor.visit(&format!("{path} {name}"), track);
    }
}

fn visit_optional<V: TrackVisitor, T: TrackValue>(
    visitor: &mut V,
    path: &str,
    name: &str,
    track: Option<&AnimTrack<T>>,
) {
    if let Some(track) = track {
        visitor.visit(&format!("{path} {name}"), track);
    }
}

fn intern<T: PartialEq>(pool: &mut Vec<T>, value: T) -> usize {
    if let Some(index) = pool.iter().position(|v| *v == value) {
        return index;
    }
    pool.push(value);
    pool.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{FilterMode, Layer, Vertex};
    use pretty_assertions::assert_eq;

    fn skinned_doc() -> Document {
        let mut doc = Document::new("Test");
        doc.nodes.push(Node::helper("Root"));
        doc.nodes.push(Node::bone("Skinned"));
        doc.nodes.push(Node::bone("Unskinned"));
        doc.nodes[1].header.parent = Some(0);
        doc.nodes[2].header.parent = Some(0);
        doc.geosets.push(Geoset {
            vertices: vec![Vertex::default(); 3],
            triangles: vec![0, 1, 2],
            matrix_groups: vec![vec![1]],
            ..Geoset::default()
        });
        doc
    }

    #[test]
    fn test_node_keywords_partition() {
        let doc = skinned_doc();
        assert_eq!(doc.node_keywords(), vec!["Helper", "Bone", "Helper"]);
    }

    #[test]
    fn test_object_ids_follow_kind_order() {
        let doc = skinned_doc();
        // The skinned bone comes first, then the helpers in node order
        assert_eq!(doc.encode_order(), vec![1, 0, 2]);
        assert_eq!(doc.object_ids(), vec![1, 0, 2]);
    }

    #[test]
    fn test_reclassify_bones() {
        let mut doc = skinned_doc();
        doc.geosets[0].matrix_groups = vec![vec![0]];
        assert_eq!(doc.reclassify_bones(), 3);
        assert!(matches!(doc.nodes[0].kind, NodeKind::Bone(_)));
        assert_eq!(doc.nodes[1].kind, NodeKind::Helper);
        assert_eq!(doc.nodes[2].kind, NodeKind::Helper);
        assert_eq!(doc.reclassify_bones(), 0);
    }

    #[test]
    fn test_interning() {
        let mut doc = Document::new("Test");
        assert_eq!(doc.intern_texture(Texture::image("a.blp")), 0);
        assert_eq!(doc.intern_texture(Texture::replaceable(1)), 1);
        assert_eq!(doc.intern_texture(Texture::image("a.blp")), 0);
        assert_eq!(doc.intern_global_sequence(2000), 0);
        assert_eq!(doc.intern_global_sequence(2000), 0);
        assert_eq!(doc.intern_global_sequence(500), 1);

        let material = Material::with_layer(Layer::new(FilterMode::Blend, 1));
        assert_eq!(doc.intern_material(material.clone()), 0);
        assert_eq!(doc.intern_material(material), 0);
        assert_eq!(doc.materials.len(), 1);
    }

    #[test]
    fn test_compute_extents() {
        let mut doc = skinned_doc();
        doc.geosets[0].vertices[1].position = Vec3::new(1.0, 0.0, 0.0);
        doc.geosets[0].vertices[2].position = Vec3::new(0.0, 1.0, 0.0);
        doc.sequences.push(Sequence::new("Stand", 0, 1000));
        doc.compute_extents();
        assert_eq!(doc.extent.max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(doc.sequences[0].extent, doc.extent);
    }

    #[test]
    fn test_key_count() {
        let mut doc = skinned_doc();
        doc.nodes[1].header.translation =
            Some(AnimTrack::linear([(0, Vec3::ZERO), (100, Vec3::ONE)]));
        doc.geoset_anims.push(GeosetAnim::new(0));
        doc.geoset_anims[0].alpha = Animated::Track(AnimTrack::linear([(0, 1.0)]));
        assert_eq!(doc.key_count(), 3);
        assert_eq!(doc.geoset_anim_for(0), Some(0));
        assert_eq!(doc.children_of(Some(0)).count(), 2);
    }
}
