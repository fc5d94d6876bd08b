use glam::{Quat, Vec3};

use super::skip_unknown;
use crate::block::Item;
use crate::error::Result;
use crate::track::AnimTrack;
use crate::writer::MdlWriter;

/// UV animation referenced by layers through `TVertexAnimId`
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureAnim {
    pub translation: Option<AnimTrack<Vec3>>,
    pub rotation: Option<AnimTrack<Quat>>,
    pub scaling: Option<AnimTrack<Vec3>>,
}

impl TextureAnim {
    pub fn parse(item: &Item) -> Result<Self> {
        let mut anim = Self::default();
        for child in item.children()? {
            match child.keyword() {
                Some("Translation") => anim.translation = Some(AnimTrack::parse(child)?),
                Some("Rotation") => anim.rotation = Some(AnimTrack::parse(child)?),
                Some("Scaling") => anim.scaling = Some(AnimTrack::parse(child)?),
                _ => skip_unknown("TVertexAnim", child),
            }
        }
        Ok(anim)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open("TVertexAnim");
        if let Some(track) = &self.translation {
            track.write("Translation", w);
        }
        if let Some(track) = &self.rotation {
            track.write("Rotation", w);
        }
        if let Some(track) = &self.scaling {
            track.write("Scaling", w);
        }
        w.close();
    }
}
