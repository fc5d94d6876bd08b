use std::fmt;

use bitflags::bitflags;
use log::trace;

use super::skip_unknown;
use crate::block::Item;
use crate::error::{MdlError, Result};
use crate::track::Animated;
use crate::writer::MdlWriter;

/// Layer blending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterMode {
    #[default]
    None,
    Transparent,
    Blend,
    Additive,
    AddAlpha,
    Modulate,
    Modulate2x,
}

impl FilterMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "None" => Self::None,
            "Transparent" => Self::Transparent,
            "Blend" => Self::Blend,
            "Additive" => Self::Additive,
            "AddAlpha" => Self::AddAlpha,
            "Modulate" => Self::Modulate,
            "Modulate2x" => Self::Modulate2x,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Transparent => "Transparent",
            Self::Blend => "Blend",
            Self::Additive => "Additive",
            Self::AddAlpha => "AddAlpha",
            Self::Modulate => "Modulate",
            Self::Modulate2x => "Modulate2x",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

bitflags! {
    /// Layer shading flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct LayerFlags: u32 {
        const UNSHADED = 0x1;
        const SPHERE_ENV_MAP = 0x2;
        const TWO_SIDED = 0x10;
        const UNFOGGED = 0x20;
        const NO_DEPTH_TEST = 0x40;
        const NO_DEPTH_SET = 0x80;
    }
}

const LAYER_FLAG_KEYWORDS: [(LayerFlags, &str); 6] = [
    (LayerFlags::UNSHADED, "Unshaded"),
    (LayerFlags::SPHERE_ENV_MAP, "SphereEnvMap"),
    (LayerFlags::TWO_SIDED, "TwoSided"),
    (LayerFlags::UNFOGGED, "Unfogged"),
    (LayerFlags::NO_DEPTH_TEST, "NoDepthTest"),
    (LayerFlags::NO_DEPTH_SET, "NoDepthSet"),
];

bitflags! {
    /// Material-wide flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct MaterialFlags: u32 {
        const CONSTANT_COLOR = 0x1;
        const SORT_PRIMS_FAR_Z = 0x10;
        const FULL_RESOLUTION = 0x20;
    }
}

const MATERIAL_FLAG_KEYWORDS: [(MaterialFlags, &str); 3] = [
    (MaterialFlags::CONSTANT_COLOR, "ConstantColor"),
    (MaterialFlags::SORT_PRIMS_FAR_Z, "SortPrimsFarZ"),
    (MaterialFlags::FULL_RESOLUTION, "FullResolution"),
];

/// One texture pass of a material
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layer {
    pub filter_mode: FilterMode,
    pub flags: LayerFlags,
    /// Index into the document's textures, constant or keyframed
    pub texture_id: Animated<u32>,
    /// Index into the document's texture animations
    pub texture_anim: Option<usize>,
    pub alpha: Animated<f32>,
    pub coord_id: u32,
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            filter_mode: FilterMode::None,
            flags: LayerFlags::empty(),
            texture_id: Animated::Static(0),
            texture_anim: None,
            alpha: Animated::Static(1.0),
            coord_id: 0,
        }
    }
}

impl Layer {
    pub fn new(filter_mode: FilterMode, texture: u32) -> Self {
        Self {
            filter_mode,
            texture_id: Animated::Static(texture),
            ..Self::default()
        }
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let mut layer = Self::default();
        for child in item.children()? {
            let Some(keyword) = child.keyword() else {
                skip_unknown("Layer", child);
                continue;
            };
            if let Some((flag, _)) = LAYER_FLAG_KEYWORDS.iter().find(|(_, k)| *k == keyword) {
                layer.flags |= *flag;
                continue;
            }
            match keyword {
                "FilterMode" => {
                    let mode = child.arg_ident(0)?;
                    layer.filter_mode = FilterMode::from_keyword(mode).ok_or_else(|| {
                        MdlError::structural(child.pos, "a filter mode", format!("'{mode}'"))
                    })?;
                }
                "TextureID" => layer.texture_id = Animated::parse(child)?,
                "TVertexAnimId" => layer.texture_anim = Some(child.arg_usize(0)?),
                "Alpha" => layer.alpha = Animated::parse(child)?,
                "CoordId" => layer.coord_id = child.arg_u32(0)?,
                _ => skip_unknown("Layer", child),
            }
        }
        trace!(
            "Layer: {} texture {:?}",
            layer.filter_mode,
            layer.texture_id.initial()
        );
        Ok(layer)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open("Layer");
        w.keyed("FilterMode", self.filter_mode.keyword());
        for (flag, keyword) in LAYER_FLAG_KEYWORDS {
            w.flag(keyword, self.flags.contains(flag));
        }
        self.texture_id.write("TextureID", w);
        if let Some(anim) = self.texture_anim {
            w.int("TVertexAnimId", anim);
        }
        if self.coord_id != 0 {
            w.int("CoordId", self.coord_id);
        }
        self.alpha.write("Alpha", w);
        w.close();
    }
}

/// A `Material` entry
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub priority_plane: i32,
    pub flags: MaterialFlags,
    pub layers: Vec<Layer>,
}

impl Material {
    pub fn with_layer(layer: Layer) -> Self {
        Self {
            layers: vec![layer],
            ..Self::default()
        }
    }

    pub fn constant_color(&self) -> bool {
        self.flags.contains(MaterialFlags::CONSTANT_COLOR)
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let mut material = Self::default();
        for child in item.children()? {
            let keyword = child.keyword().unwrap_or_default();
            if let Some((flag, _)) = MATERIAL_FLAG_KEYWORDS.iter().find(|(_, k)| *k == keyword) {
                material.flags |= *flag;
                continue;
            }
            match keyword {
                "PriorityPlane" => material.priority_plane = child.arg_i64(0)? as i32,
                "Layer" => material.layers.push(Layer::parse(child)?),
                _ => skip_unknown("Material", child),
            }
        }
        Ok(material)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open("Material");
        for (flag, keyword) in MATERIAL_FLAG_KEYWORDS {
            w.flag(keyword, self.flags.contains(flag));
        }
        if self.priority_plane != 0 {
            w.int("PriorityPlane", self.priority_plane);
        }
        for layer in &self.layers {
            layer.write(w);
        }
        w.close();
    }
}
