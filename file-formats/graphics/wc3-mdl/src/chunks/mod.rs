//! MDL chunk types with their block parsers and writers

pub mod camera;
pub mod collision;
pub mod emitter;
pub mod event;
pub mod geoset;
pub mod geoset_anim;
pub mod light;
pub mod material;
pub mod node;
pub mod sequence;
pub mod texture;
pub mod texture_anim;

pub use camera::Camera;
pub use collision::CollisionShape;
pub use emitter::{
    HeadTail, ParticleEmitter, ParticleEmitter2, ParticleEmitter2Flags, ParticleFilter,
    RibbonEmitter, SegmentUvAnim,
};
pub use event::{EventKind, EventName, EventObject};
pub use geoset::{Geoset, Vertex};
pub use geoset_anim::GeosetAnim;
pub use light::{Light, LightType};
pub use material::{FilterMode, Layer, LayerFlags, Material, MaterialFlags};
pub use node::{
    Attachment, Bone, GeosetRef, Node, NodeFlags, NodeHeader, NodeKind, OBJECT_ORDER, object_rank,
};
pub use sequence::Sequence;
pub use texture::{Texture, TextureSource};
pub use texture_anim::TextureAnim;

use glam::Vec3;
use log::warn;

use crate::block::Item;
use crate::error::Result;
use crate::geometry::{Extent, bounds_radius, round5, vec3};
use crate::writer::MdlWriter;

/// Log and skip a statement a chunk does not understand
pub(crate) fn skip_unknown(chunk: &str, item: &Item) {
    warn!(
        "{chunk}: skipping unrecognized entry {} at {}",
        item.label(),
        item.pos
    );
}

/// Collects `MinimumExtent`, `MaximumExtent` and `BoundsRadius` statements
#[derive(Default)]
pub(crate) struct ExtentReader {
    min: Option<Vec3>,
    max: Option<Vec3>,
    radius: Option<f32>,
}

impl ExtentReader {
    /// Consume `item` if it is an extent statement
    pub fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("MinimumExtent") => self.min = Some(vec3(item.arg_vector(0)?)),
            Some("MaximumExtent") => self.max = Some(vec3(item.arg_vector(0)?)),
            Some("BoundsRadius") => self.radius = Some(item.arg_f32(0)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// `None` when no extent statement was seen. A missing radius is
    /// derived from the corners.
    pub fn finish(self) -> Option<Extent> {
        if self.min.is_none() && self.max.is_none() && self.radius.is_none() {
            return None;
        }
        let min = self.min.unwrap_or(Vec3::ZERO);
        let max = self.max.unwrap_or(Vec3::ZERO);
        let radius = self
            .radius
            .unwrap_or_else(|| round5(bounds_radius(min, max)));
        Some(Extent { min, max, radius })
    }
}

pub(crate) fn write_extent(w: &mut MdlWriter, extent: &Extent) {
    w.vector("MinimumExtent", &extent.min.to_array());
    w.vector("MaximumExtent", &extent.max.to_array());
    w.float("BoundsRadius", extent.radius);
}
