use std::fmt;

use crate::chunks::{GeosetRef, NodeKind};
use crate::document::{Document, FORMAT_VERSION, TrackVisitor};
use crate::error::MdlError;
use crate::geometry::Extent;
use crate::track::{AnimTrack, Animated, EventTrack, TrackValue};

/// Tolerance on the length of a rotation quaternion
pub const UNIT_EPSILON: f32 = 1e-4;

/// Validator for MDL documents
pub struct Validator;

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new MDL validator
    pub fn new() -> Self {
        Self
    }

    /// Check every reference, model invariant and the softer warnings
    pub fn validate(&self, doc: &Document) -> ValidationReport {
        let mut report = ValidationReport::new();

        if doc.version != FORMAT_VERSION {
            report.add_warning(ValidationWarning::UnusualValue {
                field: "FormatVersion".to_string(),
                value: doc.version.to_string(),
                explanation: format!("only {FORMAT_VERSION} is written"),
            });
        }

        self.check_sequences(doc, &mut report);
        self.check_materials(doc, &mut report);
        self.check_geosets(doc, &mut report);
        self.check_nodes(doc, &mut report);
        self.check_usage(doc, &mut report);

        let mut tracks = TrackChecker {
            doc,
            report: &mut report,
            sequence_hits: vec![false; doc.sequences.len()],
            sequenced_keys: false,
        };
        doc.visit_tracks(&mut tracks);
        let TrackChecker {
            sequence_hits,
            sequenced_keys,
            ..
        } = tracks;
        if sequenced_keys {
            for (sequence, hit) in doc.sequences.iter().zip(sequence_hits) {
                if !hit {
                    report.add_warning(ValidationWarning::EmptySequence {
                        sequence: sequence.name.clone(),
                    });
                }
            }
        }

        report
    }

    fn check_sequences(&self, doc: &Document, report: &mut ValidationReport) {
        check_extent(report, "model", &doc.extent);
        for (i, sequence) in doc.sequences.iter().enumerate() {
            if sequence.end < sequence.start {
                report.add_error(ValidationError::InvalidInterval {
                    sequence: sequence.name.clone(),
                    start: sequence.start,
                    end: sequence.end,
                });
            } else if sequence.end == sequence.start {
                report.add_warning(ValidationWarning::ZeroLengthSequence {
                    sequence: sequence.name.clone(),
                });
            }
            check_extent(report, &format!("sequences[{i}]"), &sequence.extent);
        }
        for (i, duration) in doc.global_sequences.iter().enumerate() {
            if *duration == 0 {
                report.add_error(ValidationError::InvalidValue {
                    field: format!("global_sequences[{i}]"),
                    value: "0".to_string(),
                    explanation: "durations must be positive".to_string(),
                });
            }
        }
    }

    fn check_materials(&self, doc: &Document, report: &mut ValidationReport) {
        for (i, material) in doc.materials.iter().enumerate() {
            if material.layers.is_empty() {
                report.add_error(ValidationError::EmptyData {
                    field: format!("materials[{i}]"),
                    explanation: "a material needs at least one layer".to_string(),
                });
            }
            for (j, layer) in material.layers.iter().enumerate() {
                let field = format!("materials[{i}].layers[{j}]");
                for texture in animated_values(&layer.texture_id) {
                    check_index(
                        report,
                        &format!("{field}.texture_id"),
                        texture as usize,
                        doc.textures.len(),
                    );
                }
                if let Some(anim) = layer.texture_anim {
                    check_index(
                        report,
                        &format!("{field}.texture_anim"),
                        anim,
                        doc.texture_anims.len(),
                    );
                }
                if let Animated::Static(alpha) = layer.alpha
                    && !(0.0..=1.0).contains(&alpha)
                {
                    report.add_error(ValidationError::InvalidValue {
                        field: format!("{field}.alpha"),
                        value: alpha.to_string(),
                        explanation: "static alpha must lie in [0, 1]".to_string(),
                    });
                }
            }
        }
    }

    fn check_geosets(&self, doc: &Document, report: &mut ValidationReport) {
        for (i, geoset) in doc.geosets.iter().enumerate() {
            let field = format!("geosets[{i}]");
            check_index(
                report,
                &format!("{field}.material"),
                geoset.material,
                doc.materials.len(),
            );

            if geoset.triangles.len() % 3 != 0 {
                report.add_error(ValidationError::InvalidValue {
                    field: format!("{field}.triangles"),
                    value: geoset.triangles.len().to_string(),
                    explanation: "index count must be divisible by 3".to_string(),
                });
            }
            if let Some(&index) = geoset
                .triangles
                .iter()
                .find(|&&t| t as usize >= geoset.vertices.len())
            {
                check_index(
                    report,
                    &format!("{field}.triangles"),
                    index as usize,
                    geoset.vertices.len(),
                );
            }
            if let Some(vertex) = geoset
                .vertices
                .iter()
                .find(|v| v.group >= geoset.matrix_groups.len())
            {
                check_index(
                    report,
                    &format!("{field}.vertex_group"),
                    vertex.group,
                    geoset.matrix_groups.len(),
                );
            }

            for (g, group) in geoset.matrix_groups.iter().enumerate() {
                let group_field = format!("{field}.matrix_groups[{g}]");
                if group.is_empty() {
                    report.add_error(ValidationError::EmptyData {
                        field: group_field.clone(),
                        explanation: "a matrix group needs at least one node".to_string(),
                    });
                }
                for &node in group {
                    if !check_index(report, &group_field, node, doc.nodes.len()) {
                        continue;
                    }
                    let target = &doc.nodes[node];
                    if !target.kind.is_bone_or_helper() {
                        report.add_error(ValidationError::InvalidValue {
                            field: group_field.clone(),
                            value: format!("{} \"{}\"", target.kind, target.header.name),
                            explanation: "matrix groups may only name bones and helpers"
                                .to_string(),
                        });
                    }
                }
            }

            check_extent(report, &field, &geoset.extent);
        }

        for (i, anim) in doc.geoset_anims.iter().enumerate() {
            check_index(
                report,
                &format!("geoset_anims[{i}].geoset"),
                anim.geoset,
                doc.geosets.len(),
            );
        }
    }

    fn check_nodes(&self, doc: &Document, report: &mut ValidationReport) {
        for (i, node) in doc.nodes.iter().enumerate() {
            let field = format!("nodes[{i}]");
            if let Some(parent) = node.header.parent {
                check_index(report, &format!("{field}.parent"), parent, doc.nodes.len());
            }
            if !node.header.pivot.is_finite() {
                report.add_error(ValidationError::NonFinite {
                    field: format!("{field}.pivot"),
                });
            }
            match &node.kind {
                NodeKind::Bone(bone) => {
                    if let GeosetRef::Index(geoset) = bone.geoset {
                        check_index(
                            report,
                            &format!("{field}.geoset"),
                            geoset,
                            doc.geosets.len(),
                        );
                    }
                    if let Some(anim) = bone.geoset_anim {
                        check_index(
                            report,
                            &format!("{field}.geoset_anim"),
                            anim,
                            doc.geoset_anims.len(),
                        );
                    }
                }
                NodeKind::ParticleEmitter2(emitter) => {
                    check_index(
                        report,
                        &format!("{field}.texture_id"),
                        emitter.texture_id,
                        doc.textures.len(),
                    );
                }
                NodeKind::RibbonEmitter(emitter) => {
                    check_index(
                        report,
                        &format!("{field}.material"),
                        emitter.material,
                        doc.materials.len(),
                    );
                }
                _ => {}
            }
        }
        check_parent_cycles(doc, report);
    }

    fn check_usage(&self, doc: &Document, report: &mut ValidationReport) {
        let mut textures = vec![false; doc.textures.len()];
        let mut materials = vec![false; doc.materials.len()];
        let mark = |used: &mut Vec<bool>, index: usize| {
            if let Some(slot) = used.get_mut(index) {
                *slot = true;
            }
        };

        for layer in doc.materials.iter().flat_map(|m| &m.layers) {
            for texture in animated_values(&layer.texture_id) {
                mark(&mut textures, texture as usize);
            }
        }
        for geoset in &doc.geosets {
            mark(&mut materials, geoset.material);
        }
        for node in &doc.nodes {
            match &node.kind {
                NodeKind::ParticleEmitter2(emitter) => mark(&mut textures, emitter.texture_id),
                NodeKind::RibbonEmitter(emitter) => mark(&mut materials, emitter.material),
                _ => {}
            }
        }

        for (field, used) in [("textures", textures), ("materials", materials)] {
            for (index, _) in used.iter().enumerate().filter(|(_, u)| !**u) {
                report.add_warning(ValidationWarning::UnusedEntry {
                    field: field.to_string(),
                    index,
                });
            }
        }

        let skinned = doc.skinned_nodes();
        for (node, skinned) in doc.nodes.iter().zip(skinned) {
            if matches!(node.kind, NodeKind::Bone(_)) && !skinned {
                report.add_warning(ValidationWarning::BoneWithoutVertices {
                    node: node.header.name.clone(),
                });
            }
        }
    }
}

/// `true` when the index resolves
fn check_index(report: &mut ValidationReport, field: &str, value: usize, count: usize) -> bool {
    if value < count {
        return true;
    }
    report.add_error(ValidationError::InvalidReference {
        field: field.to_string(),
        value,
        count,
    });
    false
}

fn check_extent(report: &mut ValidationReport, field: &str, extent: &Extent) {
    let finite = extent.min.is_finite() && extent.max.is_finite() && extent.radius.is_finite();
    if !finite {
        report.add_error(ValidationError::NonFinite {
            field: format!("{field} extent"),
        });
    } else if extent.min.cmpgt(extent.max).any() {
        report.add_error(ValidationError::InvalidBoundingBox {
            field: field.to_string(),
            min: format!("{:?}", extent.min.to_array()),
            max: format!("{:?}", extent.max.to_array()),
        });
    }
}

/// Walks every node's parent chain; a chain that comes back to a node still
/// being walked is a cycle.
fn check_parent_cycles(doc: &Document, report: &mut ValidationReport) {
    const UNSEEN: u8 = 0;
    const WALKING: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNSEEN; doc.nodes.len()];
    for start in 0..doc.nodes.len() {
        let mut walked = Vec::new();
        let mut current = Some(start);
        while let Some(index) = current {
            match state.get(index) {
                None | Some(&DONE) => break,
                Some(&WALKING) => {
                    report.add_error(ValidationError::ParentCycle {
                        node: doc.nodes[index].header.name.clone(),
                    });
                    break;
                }
                Some(_) => {}
            }
            state[index] = WALKING;
            walked.push(index);
            current = doc.nodes[index].header.parent;
        }
        for index in walked {
            state[index] = DONE;
        }
    }
}

fn animated_values<T: TrackValue>(value: &Animated<T>) -> Vec<T> {
    match value {
        Animated::Static(v) => vec![*v],
        Animated::Track(track) => track.keys.iter().map(|k| k.value).collect(),
    }
}

struct TrackChecker<'a> {
    doc: &'a Document,
    report: &'a mut ValidationReport,
    sequence_hits: Vec<bool>,
    sequenced_keys: bool,
}

impl TrackChecker<'_> {
    /// Checks shared by keyframe and event tracks
    fn check_times(
        &mut self,
        path: &str,
        global_sequence: Option<usize>,
        sorted: bool,
        times: impl Iterator<Item = u32>,
    ) {
        if !sorted {
            self.report.add_error(ValidationError::UnsortedKeys {
                track: path.to_string(),
            });
        }

        if let Some(global) = global_sequence {
            let count = self.doc.global_sequences.len();
            if !check_index(self.report, &format!("{path} GlobalSeqId"), global, count) {
                return;
            }
            let duration = self.doc.global_sequences[global];
            // The window is [0, duration]: a closing key at the duration is allowed
            if let Some(time) = times.into_iter().find(|t| *t > duration) {
                self.report.add_error(ValidationError::KeyOutsideGlobalSequence {
                    track: path.to_string(),
                    time,
                    duration,
                });
            }
            return;
        }

        let mut outside = None;
        for time in times {
            self.sequenced_keys = true;
            let mut found = false;
            for (hit, sequence) in self.sequence_hits.iter_mut().zip(&self.doc.sequences) {
                if sequence.contains(time) {
                    *hit = true;
                    found = true;
                }
            }
            if !found && outside.is_none() {
                outside = Some(time);
            }
        }
        if let Some(time) = outside {
            self.report.add_error(ValidationError::KeyOutsideSequences {
                track: path.to_string(),
                time,
            });
        }
    }
}

impl TrackVisitor for TrackChecker<'_> {
    fn visit<T: TrackValue>(&mut self, path: &str, track: &AnimTrack<T>) {
        self.check_times(
            path,
            track.global_sequence,
            track.is_sorted(),
            track.keys.iter().map(|k| k.time),
        );

        for key in &track.keys {
            let tangents_finite = key
                .tangents
                .is_none_or(|t| t.in_tan.is_finite() && t.out_tan.is_finite());
            if !key.value.is_finite() || !tangents_finite {
                self.report.add_error(ValidationError::NonFinite {
                    field: format!("{path} key {}", key.time),
                });
                break;
            }
            let error = key.value.unit_error();
            if error > UNIT_EPSILON {
                self.report.add_error(ValidationError::NonUnitQuaternion {
                    track: path.to_string(),
                    time: key.time,
                    length_error: error,
                });
                break;
            }
        }
    }

    fn visit_events(&mut self, path: &str, track: &EventTrack) {
        self.check_times(
            path,
            track.global_sequence,
            track.is_sorted(),
            track.times.iter().copied(),
        );
    }
}

/// Validation report
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Problems that prevent encoding
    pub errors: Vec<ValidationError>,

    /// Suspicious but encodable content
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Create a new empty validation report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Errors checked on decode: dangling indices and parent cycles
    pub fn reference_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| e.is_reference())
    }

    /// Errors checked only on encode
    pub fn invariant_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| !e.is_reference())
    }
}

/// Validation error types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An index points outside the list it refers to
    InvalidReference {
        field: String,
        value: usize,
        count: usize,
    },

    /// Following parent links leads back to this node
    ParentCycle { node: String },

    /// Key times do not strictly increase
    UnsortedKeys { track: String },

    /// A key of a sequence-driven track lies in no sequence
    KeyOutsideSequences { track: String, time: u32 },

    /// A key of a global track lies past the global sequence's end
    KeyOutsideGlobalSequence {
        track: String,
        time: u32,
        duration: u32,
    },

    /// A rotation key that is not a unit quaternion
    NonUnitQuaternion {
        track: String,
        time: u32,
        length_error: f32,
    },

    /// NaN or infinity
    NonFinite { field: String },

    /// Sequence ends before it starts
    InvalidInterval {
        sequence: String,
        start: u32,
        end: u32,
    },

    /// Invalid bounding box
    InvalidBoundingBox {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid value
    InvalidValue {
        field: String,
        value: String,
        explanation: String,
    },

    /// Empty required data
    EmptyData { field: String, explanation: String },
}

impl ValidationError {
    /// Reference errors make a document undecodable as well as unencodable
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Self::InvalidReference { .. } | Self::ParentCycle { .. }
        )
    }

    pub fn to_mdl_error(&self) -> MdlError {
        match self {
            Self::InvalidReference {
                field,
                value,
                count,
            } => MdlError::reference(field.clone(), *value, *count),
            Self::ParentCycle { node } => MdlError::ParentCycle { node: node.clone() },
            other => MdlError::Invariant(other.to_string()),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference {
                field,
                value,
                count,
            } => write!(f, "Invalid reference in {field}: {value}, {count} available"),
            Self::ParentCycle { node } => write!(f, "Parent cycle through node \"{node}\""),
            Self::UnsortedKeys { track } => write!(f, "Key times of {track} are not increasing"),
            Self::KeyOutsideSequences { track, time } => {
                write!(f, "Key {time} of {track} lies in no sequence")
            }
            Self::KeyOutsideGlobalSequence {
                track,
                time,
                duration,
            } => write!(
                f,
                "Key {time} of {track} lies past its global sequence ({duration} ms)"
            ),
            Self::NonUnitQuaternion {
                track,
                time,
                length_error,
            } => write!(
                f,
                "Key {time} of {track} is not a unit quaternion (length off by {length_error})"
            ),
            Self::NonFinite { field } => write!(f, "Non-finite number in {field}"),
            Self::InvalidInterval {
                sequence,
                start,
                end,
            } => write!(f, "Sequence \"{sequence}\" ends at {end} before its start {start}"),
            Self::InvalidBoundingBox { field, min, max } => {
                write!(f, "Invalid bounding box in {field}: min {min} exceeds max {max}")
            }
            Self::InvalidValue {
                field,
                value,
                explanation,
            } => write!(f, "Invalid value in {field}: {value} ({explanation})"),
            Self::EmptyData { field, explanation } => {
                write!(f, "Empty data for {field}: {explanation}")
            }
        }
    }
}

/// Validation warning types
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Texture or material nothing refers to
    UnusedEntry { field: String, index: usize },

    /// Bone no matrix group references; it is written as a helper
    BoneWithoutVertices { node: String },

    /// No keyframe of any track falls inside the sequence
    EmptySequence { sequence: String },

    ZeroLengthSequence { sequence: String },

    /// Unusual value
    UnusualValue {
        field: String,
        value: String,
        explanation: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnusedEntry { field, index } => write!(f, "{field}[{index}] is never used"),
            Self::BoneWithoutVertices { node } => {
                write!(f, "Bone \"{node}\" skins no vertices and is written as a helper")
            }
            Self::EmptySequence { sequence } => {
                write!(f, "Sequence \"{sequence}\" contains no keyframes")
            }
            Self::ZeroLengthSequence { sequence } => {
                write!(f, "Sequence \"{sequence}\" has zero length")
            }
            Self::UnusualValue {
                field,
                value,
                explanation,
            } => write!(f, "Unusual value in {field}: {value} ({explanation})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::{FilterMode, Geoset, Layer, Material, Node, Sequence, Texture, Vertex};
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    fn valid_doc() -> Document {
        let mut doc = Document::new("Valid");
        doc.sequences.push(Sequence::new("Stand", 0, 1000));
        doc.textures.push(Texture::image("a.blp"));
        doc.materials
            .push(Material::with_layer(Layer::new(FilterMode::None, 0)));
        doc.nodes.push(Node::bone("B"));
        doc.geosets.push(Geoset {
            vertices: vec![Vertex::default(); 3],
            triangles: vec![0, 1, 2],
            matrix_groups: vec![vec![0]],
            ..Geoset::default()
        });
        doc
    }

    #[test]
    fn test_valid_document() {
        let report = Validator::new().validate(&valid_doc());
        assert!(!report.has_errors(), "{:?}", report.errors);
        assert!(!report.has_warnings(), "{:?}", report.warnings);
    }

    #[test]
    fn test_dangling_references() {
        let mut doc = valid_doc();
        doc.geosets[0].material = 3;
        doc.nodes[0].header.parent = Some(7);
        let report = Validator::new().validate(&doc);
        let fields: Vec<String> = report
            .reference_errors()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            fields,
            vec![
                "Invalid reference in geosets[0].material: 3, 1 available",
                "Invalid reference in nodes[0].parent: 7, 1 available",
            ]
        );
    }

    #[test]
    fn test_parent_cycle() {
        let mut doc = valid_doc();
        doc.nodes.push(Node::helper("H"));
        doc.nodes[0].header.parent = Some(1);
        doc.nodes[1].header.parent = Some(0);
        let report = Validator::new().validate(&doc);
        assert_eq!(
            report.reference_errors().cloned().collect::<Vec<_>>(),
            vec![ValidationError::ParentCycle {
                node: "B".to_string()
            }]
        );
        assert!(matches!(
            report.errors[0].to_mdl_error(),
            MdlError::ParentCycle { .. }
        ));
    }

    #[test]
    fn test_track_invariants() {
        let mut doc = valid_doc();
        doc.nodes[0].header.translation = Some(AnimTrack::linear([
            (500, Vec3::ZERO),
            (100, Vec3::ONE),
            (2000, Vec3::ONE),
        ]));
        doc.nodes[0].header.rotation =
            Some(AnimTrack::linear([(0, Quat::from_xyzw(0.0, 0.0, 0.0, 2.0))]));
        let report = Validator::new().validate(&doc);
        assert_eq!(report.reference_errors().count(), 0);
        let invariants: Vec<&ValidationError> = report.invariant_errors().collect();
        assert!(matches!(invariants[0], ValidationError::UnsortedKeys { .. }));
        assert!(matches!(
            invariants[1],
            ValidationError::KeyOutsideSequences { time: 2000, .. }
        ));
        assert!(matches!(
            invariants[2],
            ValidationError::NonUnitQuaternion { time: 0, .. }
        ));
        assert!(matches!(
            invariants[2].to_mdl_error(),
            MdlError::Invariant(_)
        ));
    }

    #[test]
    fn test_global_sequence_reference() {
        let mut doc = valid_doc();
        let mut track = AnimTrack::linear([(0, 1.0f32), (3000, 0.0)]);
        track.global_sequence = Some(0);
        doc.materials[0].layers[0].alpha = Animated::Track(track);
        let report = Validator::new().validate(&doc);
        assert!(matches!(
            report.errors[0],
            ValidationError::InvalidReference { value: 0, count: 0, .. }
        ));

        doc.global_sequences.push(2000);
        let report = Validator::new().validate(&doc);
        assert!(matches!(
            report.errors[0],
            ValidationError::KeyOutsideGlobalSequence {
                time: 3000,
                duration: 2000,
                ..
            }
        ));
    }

    #[test]
    fn test_global_sequence_window_includes_duration() {
        let mut doc = valid_doc();
        doc.global_sequences.push(2000);
        let mut track = AnimTrack::linear([(0, 1.0f32), (2000, 1.0)]);
        track.global_sequence = Some(0);
        doc.materials[0].layers[0].alpha = Animated::Track(track.clone());
        assert!(!Validator::new().validate(&doc).has_errors());

        track.keys[1].time = 2001;
        doc.materials[0].layers[0].alpha = Animated::Track(track);
        let report = Validator::new().validate(&doc);
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::KeyOutsideGlobalSequence { time: 2001, .. }]
        ));
    }

    #[test]
    fn test_warnings() {
        let mut doc = valid_doc();
        doc.textures.push(Texture::replaceable(1));
        doc.nodes.push(Node::bone("Loose"));
        doc.sequences.push(Sequence::new("Death", 2000, 2000));
        doc.nodes[0].header.visibility = Some(AnimTrack::linear([(0, 1.0)]));
        let report = Validator::new().validate(&doc);
        assert!(!report.has_errors(), "{:?}", report.errors);
        assert_eq!(
            report.warnings,
            vec![
                ValidationWarning::ZeroLengthSequence {
                    sequence: "Death".to_string()
                },
                ValidationWarning::UnusedEntry {
                    field: "textures".to_string(),
                    index: 1
                },
                ValidationWarning::BoneWithoutVertices {
                    node: "Loose".to_string()
                },
                ValidationWarning::EmptySequence {
                    sequence: "Death".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_matrix_group_must_name_bones() {
        let mut doc = valid_doc();
        doc.nodes[0] = Node::new(
            "Light",
            NodeKind::Light(crate::chunks::Light::default()),
        );
        let report = Validator::new().validate(&doc);
        assert!(matches!(
            report.errors[0],
            ValidationError::InvalidValue { .. }
        ));
    }
}
