use super::skip_unknown;
use crate::block::Item;
use crate::error::{MdlError, Result};
use crate::geometry::Rgb;
use crate::track::Animated;
use crate::writer::MdlWriter;

/// Per-geoset color and visibility animation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeosetAnim {
    pub alpha: Animated<f32>,
    pub color: Animated<Rgb>,
    /// Index of the animated geoset
    pub geoset: usize,
    pub drop_shadow: bool,
}

impl GeosetAnim {
    pub fn new(geoset: usize) -> Self {
        Self {
            alpha: Animated::Static(1.0),
            color: Animated::Static(Rgb::WHITE),
            geoset,
            drop_shadow: false,
        }
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let mut anim = Self::new(0);
        let mut geoset = None;
        for child in item.children()? {
            match child.keyword() {
                Some("Alpha") => anim.alpha = Animated::parse(child)?,
                Some("Color") => anim.color = Animated::parse(child)?,
                Some("GeosetId") => geoset = Some(child.arg_usize(0)?),
                Some("DropShadow") => anim.drop_shadow = true,
                _ => skip_unknown("GeosetAnim", child),
            }
        }
        anim.geoset = geoset
            .ok_or_else(|| MdlError::structural(item.pos, "'GeosetId' in GeosetAnim", "'}'"))?;
        Ok(anim)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open("GeosetAnim");
        w.flag("DropShadow", self.drop_shadow);
        self.alpha.write("Alpha", w);
        self.color.write("Color", w);
        w.int("GeosetId", self.geoset);
        w.close();
    }
}
