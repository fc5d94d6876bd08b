//! Scene-graph nodes: the shared header plus one payload per node kind

use std::fmt;

use bitflags::bitflags;
use glam::{Quat, Vec3};
use log::debug;

use super::{CollisionShape, EventObject, Light, ParticleEmitter, ParticleEmitter2, RibbonEmitter};
use super::skip_unknown;
use crate::block::{Item, Value};
use crate::error::{MdlError, Result};
use crate::track::AnimTrack;
use crate::writer::MdlWriter;

bitflags! {
    /// Inheritance and billboarding flags shared by all nodes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct NodeFlags: u32 {
        const DONT_INHERIT_TRANSLATION = 0x1;
        const DONT_INHERIT_ROTATION = 0x2;
        const DONT_INHERIT_SCALING = 0x4;
        const BILLBOARDED = 0x8;
        const BILLBOARDED_LOCK_X = 0x10;
        const BILLBOARDED_LOCK_Y = 0x20;
        const BILLBOARDED_LOCK_Z = 0x40;
        const CAMERA_ANCHORED = 0x80;
    }
}

const DONT_INHERIT_KEYWORDS: [(NodeFlags, &str); 3] = [
    (NodeFlags::DONT_INHERIT_TRANSLATION, "Translation"),
    (NodeFlags::DONT_INHERIT_ROTATION, "Rotation"),
    (NodeFlags::DONT_INHERIT_SCALING, "Scaling"),
];

const FLAG_KEYWORDS: [(NodeFlags, &str); 5] = [
    (NodeFlags::BILLBOARDED, "Billboarded"),
    (NodeFlags::BILLBOARDED_LOCK_X, "BillboardedLockX"),
    (NodeFlags::BILLBOARDED_LOCK_Y, "BillboardedLockY"),
    (NodeFlags::BILLBOARDED_LOCK_Z, "BillboardedLockZ"),
    (NodeFlags::CAMERA_ANCHORED, "CameraAnchored"),
];

/// Node keywords in object id order
pub const OBJECT_ORDER: [&str; 9] = [
    "Bone",
    "Light",
    "Helper",
    "Attachment",
    "ParticleEmitter",
    "ParticleEmitter2",
    "RibbonEmitter",
    "EventObject",
    "CollisionShape",
];

/// Rank of a node keyword in [`OBJECT_ORDER`]
pub fn object_rank(keyword: &str) -> usize {
    OBJECT_ORDER
        .iter()
        .position(|k| *k == keyword)
        .unwrap_or(OBJECT_ORDER.len())
}

/// Fields every node carries
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeHeader {
    pub name: String,
    /// Index of the parent node
    pub parent: Option<usize>,
    /// Rotation/scaling origin, from the `PivotPoints` table
    pub pivot: Vec3,
    pub flags: NodeFlags,
    pub translation: Option<AnimTrack<Vec3>>,
    pub rotation: Option<AnimTrack<Quat>>,
    pub scaling: Option<AnimTrack<Vec3>>,
    pub visibility: Option<AnimTrack<f32>>,
}

impl NodeHeader {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn read(&mut self, item: &Item) -> Result<bool> {
        let Some(keyword) = item.keyword() else {
            return Ok(false);
        };
        if let Some((flag, _)) = FLAG_KEYWORDS.iter().find(|(_, k)| *k == keyword) {
            self.flags |= *flag;
            return Ok(true);
        }
        match keyword {
            "DontInherit" => {
                for entry in item.children()? {
                    let found = DONT_INHERIT_KEYWORDS
                        .iter()
                        .find(|(_, k)| entry.keyword() == Some(*k));
                    match found {
                        Some((flag, _)) => self.flags |= *flag,
                        None => skip_unknown("DontInherit", entry),
                    }
                }
            }
            "Translation" => self.translation = Some(AnimTrack::parse(item)?),
            "Rotation" => self.rotation = Some(AnimTrack::parse(item)?),
            "Scaling" => self.scaling = Some(AnimTrack::parse(item)?),
            "Visibility" => self.visibility = Some(AnimTrack::parse(item)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn write_flags(&self, w: &mut MdlWriter) {
        let inherit: Vec<&str> = DONT_INHERIT_KEYWORDS
            .iter()
            .filter(|(flag, _)| self.flags.contains(*flag))
            .map(|(_, k)| *k)
            .collect();
        if !inherit.is_empty() {
            w.field(format!("DontInherit {{ {} }}", inherit.join(", ")));
        }
        for (flag, keyword) in FLAG_KEYWORDS {
            w.flag(keyword, self.flags.contains(flag));
        }
    }

    fn write_tracks(&self, w: &mut MdlWriter) {
        if let Some(track) = &self.translation {
            track.write("Translation", w);
        }
        if let Some(track) = &self.rotation {
            track.write("Rotation", w);
        }
        if let Some(track) = &self.scaling {
            track.write("Scaling", w);
        }
        if let Some(track) = &self.visibility {
            track.write("Visibility", w);
        }
    }
}

/// Geoset a bone is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeosetRef {
    #[default]
    None,
    Index(usize),
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bone {
    pub geoset: GeosetRef,
    /// Index into the document's geoset animations
    pub geoset_anim: Option<usize>,
}

impl Bone {
    fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("GeosetId") => {
                self.geoset = match item.args.first() {
                    Some(Value::Ident(s)) if s == "Multiple" => GeosetRef::Multiple,
                    Some(Value::Ident(s)) if s == "None" => GeosetRef::None,
                    Some(Value::Int(-1)) => GeosetRef::None,
                    _ => GeosetRef::Index(item.arg_usize(0)?),
                };
            }
            Some("GeosetAnimId") => {
                self.geoset_anim = match item.args.first() {
                    Some(Value::Ident(s)) if s == "None" => None,
                    Some(Value::Int(-1)) => None,
                    _ => Some(item.arg_usize(0)?),
                };
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn write(&self, w: &mut MdlWriter) {
        match self.geoset {
            GeosetRef::None => {}
            GeosetRef::Index(i) => w.int("GeosetId", i),
            GeosetRef::Multiple => w.keyed("GeosetId", "Multiple"),
        }
        match self.geoset_anim {
            Some(i) => w.int("GeosetAnimId", i),
            None => w.keyed("GeosetAnimId", "None"),
        }
    }
}

/// Named mount point (weapons, effects, overhead markers)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attachment {
    pub attachment_id: u32,
    /// Model spawned at the attachment
    pub path: Option<String>,
}

impl Attachment {
    fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("AttachmentID") => self.attachment_id = item.arg_u32(0)?,
            Some("Path") => self.path = Some(item.arg_str(0)?.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn write(&self, w: &mut MdlWriter) {
        w.int("AttachmentID", self.attachment_id);
        if let Some(path) = &self.path {
            w.quoted("Path", path);
        }
    }
}

/// Node payload
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Bone(Bone),
    Light(Light),
    /// A bone without skinned vertices
    Helper,
    Attachment(Attachment),
    ParticleEmitter(ParticleEmitter),
    ParticleEmitter2(Box<ParticleEmitter2>),
    RibbonEmitter(RibbonEmitter),
    EventObject(EventObject),
    CollisionShape(CollisionShape),
}

impl NodeKind {
    /// Top-level keyword of the node's block
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Bone(_) => "Bone",
            Self::Light(_) => "Light",
            Self::Helper => "Helper",
            Self::Attachment(_) => "Attachment",
            Self::ParticleEmitter(_) => "ParticleEmitter",
            Self::ParticleEmitter2(_) => "ParticleEmitter2",
            Self::RibbonEmitter(_) => "RibbonEmitter",
            Self::EventObject(_) => "EventObject",
            Self::CollisionShape(_) => "CollisionShape",
        }
    }

    /// Empty payload for a top-level keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "Bone" => Self::Bone(Bone::default()),
            "Light" => Self::Light(Light::default()),
            "Helper" => Self::Helper,
            "Attachment" => Self::Attachment(Attachment::default()),
            "ParticleEmitter" => Self::ParticleEmitter(ParticleEmitter::default()),
            "ParticleEmitter2" => Self::ParticleEmitter2(Box::default()),
            "RibbonEmitter" => Self::RibbonEmitter(RibbonEmitter::default()),
            "EventObject" => Self::EventObject(EventObject::default()),
            "CollisionShape" => Self::CollisionShape(CollisionShape::default()),
            _ => return None,
        })
    }

    /// Position of the kind in the object id enumeration
    pub fn rank(&self) -> usize {
        object_rank(self.keyword())
    }

    pub fn is_bone_or_helper(&self) -> bool {
        matches!(self, Self::Bone(_) | Self::Helper)
    }

    fn read(&mut self, item: &Item) -> Result<bool> {
        match self {
            Self::Bone(bone) => bone.read(item),
            Self::Light(light) => light.read(item),
            Self::Helper => Ok(false),
            Self::Attachment(attachment) => attachment.read(item),
            Self::ParticleEmitter(emitter) => emitter.read(item),
            Self::ParticleEmitter2(emitter) => emitter.read(item),
            Self::RibbonEmitter(emitter) => emitter.read(item),
            Self::EventObject(event) => event.read(item),
            Self::CollisionShape(shape) => shape.read(item),
        }
    }

    fn write(&self, w: &mut MdlWriter) {
        match self {
            Self::Bone(bone) => bone.write(w),
            Self::Light(light) => light.write(w),
            Self::Helper => {}
            Self::Attachment(attachment) => attachment.write(w),
            Self::ParticleEmitter(emitter) => emitter.write(w),
            Self::ParticleEmitter2(emitter) => emitter.write(w),
            Self::RibbonEmitter(emitter) => emitter.write(w),
            Self::EventObject(event) => event.write(w),
            Self::CollisionShape(shape) => shape.write(w),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A node of the model's hierarchy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub header: NodeHeader,
    pub kind: NodeKind,
}

/// A node as read from the file, before object ids are resolved
#[derive(Debug, Clone)]
pub(crate) struct RawNode {
    pub node: Node,
    pub object_id: Option<usize>,
    pub parent_id: Option<usize>,
    pub pos: crate::error::Position,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            header: NodeHeader::new(name),
            kind,
        }
    }

    pub fn bone(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Bone(Bone::default()))
    }

    pub fn helper(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Helper)
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub(crate) fn parse(item: &Item, kind: NodeKind) -> Result<RawNode> {
        let mut node = Self::new(item.arg_str(0)?, kind);
        let mut object_id = None;
        let mut parent_id = None;

        for child in item.children()? {
            match child.keyword() {
                Some("ObjectId") => {
                    object_id = Some(child.arg_usize(0)?);
                    continue;
                }
                Some("Parent") => {
                    let parent = child.arg_i64(0)?;
                    parent_id = match parent {
                        -1 => None,
                        p if p >= 0 => Some(p as usize),
                        p => {
                            return Err(MdlError::structural(
                                child.pos,
                                "a parent object id or -1",
                                p.to_string(),
                            ));
                        }
                    };
                    continue;
                }
                _ => {}
            }
            if node.kind.read(child)? || node.header.read(child)? {
                continue;
            }
            skip_unknown(node.kind.keyword(), child);
        }

        debug!(
            "{} \"{}\": object id {:?}, parent {:?}",
            node.kind, node.header.name, object_id, parent_id
        );
        Ok(RawNode {
            node,
            object_id,
            parent_id,
            pos: item.pos,
        })
    }

    /// Encode under `keyword`, which differs from the node's own kind when a
    /// bone is written as a helper or the reverse. Payload fields are only
    /// written when the keyword matches.
    pub(crate) fn write(
        &self,
        w: &mut MdlWriter,
        keyword: &str,
        object_id: usize,
        parent_id: Option<usize>,
    ) {
        w.open(format!("{keyword} \"{}\"", self.header.name));
        w.int("ObjectId", object_id);
        if let Some(parent) = parent_id {
            w.int("Parent", parent);
        }
        self.header.write_flags(w);
        if keyword == self.kind.keyword() {
            self.kind.write(w);
        }
        self.header.write_tracks(w);
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_items;
    use pretty_assertions::assert_eq;

    fn parse_node(src: &str) -> RawNode {
        let items = parse_items(src.as_bytes()).unwrap();
        let kind = NodeKind::from_keyword(items[0].keyword().unwrap()).unwrap();
        Node::parse(&items[0], kind).unwrap()
    }

    #[test]
    fn test_parse_bone() {
        let raw = parse_node(
            "Bone \"Arm\" {\n\tObjectId 3,\n\tParent 1,\n\tGeosetId Multiple,\n\tGeosetAnimId None,\n\tBillboarded,\n\tDontInherit { Rotation },\n\tRotation 1 {\n\t\tLinear,\n\t\t0: { 0, 0, 0, 1 },\n\t}\n}",
        );
        assert_eq!(raw.object_id, Some(3));
        assert_eq!(raw.parent_id, Some(1));
        assert_eq!(
            raw.node.header.flags,
            NodeFlags::BILLBOARDED | NodeFlags::DONT_INHERIT_ROTATION
        );
        assert_eq!(
            raw.node.kind,
            NodeKind::Bone(Bone {
                geoset: GeosetRef::Multiple,
                geoset_anim: None,
            })
        );
        assert_eq!(raw.node.header.rotation.unwrap().keys[0].value, Quat::IDENTITY);
    }

    #[test]
    fn test_parent_minus_one() {
        let raw = parse_node("Helper \"Root\" {\n\tObjectId 0,\n\tParent -1,\n}");
        assert_eq!(raw.parent_id, None);
        assert_eq!(raw.node.kind, NodeKind::Helper);
    }

    #[test]
    fn test_attachment_round_trip() {
        let mut node = Node::new(
            "Origin Ref",
            NodeKind::Attachment(Attachment {
                attachment_id: 2,
                path: Some(r"Abilities\Spells\Aura.mdl".to_string()),
            }),
        );
        node.header.visibility = Some(AnimTrack::linear([(0, 1.0), (100, 0.0)]));

        let mut w = MdlWriter::new();
        node.write(&mut w, "Attachment", 4, Some(0));
        let text = w.finish();
        assert!(text.starts_with("Attachment \"Origin Ref\" {\n\tObjectId 4,\n\tParent 0,\n"));

        let raw = parse_node(&text);
        assert_eq!(raw.node, node);
        assert_eq!(raw.object_id, Some(4));
    }

    #[test]
    fn test_bone_written_as_helper_drops_payload() {
        let node = Node::bone("Unused");
        let mut w = MdlWriter::new();
        node.write(&mut w, "Helper", 0, None);
        let text = w.finish();
        assert_eq!(text, "Helper \"Unused\" {\n\tObjectId 0,\n}\n");
    }
}
