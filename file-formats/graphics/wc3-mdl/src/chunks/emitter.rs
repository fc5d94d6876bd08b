//! Particle emitters (model-spawning and sprite-based) and ribbon emitters

use bitflags::bitflags;

use super::skip_unknown;
use crate::block::Item;
use crate::error::{MdlError, Result};
use crate::geometry::Rgb;
use crate::track::Animated;
use crate::writer::{MdlWriter, format_float, format_int_list, format_vector};

/// Emitter that spawns copies of a model (`ParticleEmitter`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleEmitter {
    pub uses_mdl: bool,
    pub uses_tga: bool,
    pub emission_rate: Animated<f32>,
    pub gravity: Animated<f32>,
    pub longitude: Animated<f32>,
    pub latitude: Animated<f32>,
    pub life_span: Animated<f32>,
    pub init_velocity: Animated<f32>,
    /// Model spawned for each particle
    pub path: String,
}

impl Default for ParticleEmitter {
    fn default() -> Self {
        Self {
            uses_mdl: false,
            uses_tga: false,
            emission_rate: Animated::Static(0.0),
            gravity: Animated::Static(0.0),
            longitude: Animated::Static(0.0),
            latitude: Animated::Static(0.0),
            life_span: Animated::Static(0.0),
            init_velocity: Animated::Static(0.0),
            path: String::new(),
        }
    }
}

impl ParticleEmitter {
    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("EmitterUsesMDL") => self.uses_mdl = true,
            Some("EmitterUsesTGA") => self.uses_tga = true,
            Some("EmissionRate") => self.emission_rate = Animated::parse(item)?,
            Some("Gravity") => self.gravity = Animated::parse(item)?,
            Some("Longitude") => self.longitude = Animated::parse(item)?,
            Some("Latitude") => self.latitude = Animated::parse(item)?,
            Some("Particle") => {
                for child in item.children()? {
                    match child.keyword() {
                        Some("LifeSpan") => self.life_span = Animated::parse(child)?,
                        Some("InitVelocity") => self.init_velocity = Animated::parse(child)?,
                        Some("Path") => self.path = child.arg_str(0)?.to_string(),
                        _ => skip_unknown("Particle", child),
                    }
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        w.flag("EmitterUsesMDL", self.uses_mdl);
        w.flag("EmitterUsesTGA", self.uses_tga);
        self.emission_rate.write("EmissionRate", w);
        self.gravity.write("Gravity", w);
        self.longitude.write("Longitude", w);
        self.latitude.write("Latitude", w);
        w.open("Particle");
        self.life_span.write("LifeSpan", w);
        self.init_velocity.write("InitVelocity", w);
        w.quoted("Path", &self.path);
        w.close();
    }
}

/// Sprite blending of a `ParticleEmitter2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticleFilter {
    #[default]
    Blend,
    Additive,
    Modulate,
    Modulate2x,
    AlphaKey,
}

impl ParticleFilter {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "Blend" => Self::Blend,
            "Additive" => Self::Additive,
            "Modulate" => Self::Modulate,
            "Modulate2x" => Self::Modulate2x,
            "AlphaKey" => Self::AlphaKey,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Blend => "Blend",
            Self::Additive => "Additive",
            Self::Modulate => "Modulate",
            Self::Modulate2x => "Modulate2x",
            Self::AlphaKey => "AlphaKey",
        }
    }
}

/// Which sprites a `ParticleEmitter2` draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeadTail {
    #[default]
    Head,
    Tail,
    Both,
}

impl HeadTail {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "Head" => Self::Head,
            "Tail" => Self::Tail,
            "Both" => Self::Both,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Tail => "Tail",
            Self::Both => "Both",
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ParticleEmitter2Flags: u32 {
        const SORT_PRIMS_FAR_Z = 0x1;
        const UNSHADED = 0x2;
        const LINE_EMITTER = 0x4;
        const UNFOGGED = 0x8;
        const MODEL_SPACE = 0x10;
        const XY_QUAD = 0x20;
    }
}

const PE2_FLAG_KEYWORDS: [(ParticleEmitter2Flags, &str); 6] = [
    (ParticleEmitter2Flags::SORT_PRIMS_FAR_Z, "SortPrimsFarZ"),
    (ParticleEmitter2Flags::UNSHADED, "Unshaded"),
    (ParticleEmitter2Flags::LINE_EMITTER, "LineEmitter"),
    (ParticleEmitter2Flags::UNFOGGED, "Unfogged"),
    (ParticleEmitter2Flags::MODEL_SPACE, "ModelSpace"),
    (ParticleEmitter2Flags::XY_QUAD, "XYQuad"),
];

/// Sprite-sheet cell range `{ start, end, repeat }` for one particle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentUvAnim {
    pub start: u32,
    pub end: u32,
    pub repeat: u32,
}

impl SegmentUvAnim {
    fn parse(item: &Item) -> Result<Self> {
        let [start, end, repeat] = item.arg_u32_vector::<3>(0)?;
        Ok(Self { start, end, repeat })
    }

    fn write(&self, keyword: &str, w: &mut MdlWriter) {
        w.keyed(keyword, format_int_list(&[self.start, self.end, self.repeat]));
    }
}

/// Sprite particle emitter (`ParticleEmitter2`)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleEmitter2 {
    pub flags: ParticleEmitter2Flags,
    pub filter: ParticleFilter,
    pub head_tail: HeadTail,
    pub squirt: bool,
    pub speed: Animated<f32>,
    pub variation: Animated<f32>,
    pub latitude: Animated<f32>,
    pub gravity: Animated<f32>,
    pub emission_rate: Animated<f32>,
    pub width: Animated<f32>,
    /// `Length` on the wire
    pub height: Animated<f32>,
    pub life_span: f32,
    pub rows: u32,
    pub columns: u32,
    pub tail_length: f32,
    /// Fraction of the life span at which the mid segment is reached
    pub time: f32,
    /// Start, mid and end colors
    pub segment_color: [Rgb; 3],
    /// Start, mid and end alpha (0-255)
    pub segment_alpha: [u8; 3],
    /// Start, mid and end scale
    pub segment_scaling: [f32; 3],
    pub head_life_uv: SegmentUvAnim,
    pub head_decay_uv: SegmentUvAnim,
    pub tail_life_uv: SegmentUvAnim,
    pub tail_decay_uv: SegmentUvAnim,
    /// Index into the document's textures
    pub texture_id: usize,
    pub replaceable_id: u32,
    pub priority_plane: i32,
}

impl Default for ParticleEmitter2 {
    fn default() -> Self {
        Self {
            flags: ParticleEmitter2Flags::empty(),
            filter: ParticleFilter::Blend,
            head_tail: HeadTail::Head,
            squirt: false,
            speed: Animated::Static(0.0),
            variation: Animated::Static(0.0),
            latitude: Animated::Static(0.0),
            gravity: Animated::Static(0.0),
            emission_rate: Animated::Static(0.0),
            width: Animated::Static(0.0),
            height: Animated::Static(0.0),
            life_span: 0.0,
            rows: 1,
            columns: 1,
            tail_length: 0.0,
            time: 0.5,
            segment_color: [Rgb::WHITE; 3],
            segment_alpha: [255; 3],
            segment_scaling: [1.0; 3],
            head_life_uv: SegmentUvAnim::default(),
            head_decay_uv: SegmentUvAnim::default(),
            tail_life_uv: SegmentUvAnim::default(),
            tail_decay_uv: SegmentUvAnim::default(),
            texture_id: 0,
            replaceable_id: 0,
            priority_plane: 0,
        }
    }
}

impl ParticleEmitter2 {
    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        let Some(keyword) = item.keyword() else {
            return Ok(false);
        };
        if let Some((flag, _)) = PE2_FLAG_KEYWORDS.iter().find(|(_, k)| *k == keyword) {
            self.flags |= *flag;
            return Ok(true);
        }
        if let Some(filter) = ParticleFilter::from_keyword(keyword) {
            self.filter = filter;
            return Ok(true);
        }
        if let Some(head_tail) = HeadTail::from_keyword(keyword) {
            self.head_tail = head_tail;
            return Ok(true);
        }
        match keyword {
            "Squirt" => self.squirt = true,
            "Speed" => self.speed = Animated::parse(item)?,
            "Variation" => self.variation = Animated::parse(item)?,
            "Latitude" => self.latitude = Animated::parse(item)?,
            "Gravity" => self.gravity = Animated::parse(item)?,
            "EmissionRate" => self.emission_rate = Animated::parse(item)?,
            "Width" => self.width = Animated::parse(item)?,
            "Length" => self.height = Animated::parse(item)?,
            "LifeSpan" => self.life_span = item.arg_f32(0)?,
            "Rows" => self.rows = item.arg_u32(0)?,
            "Columns" => self.columns = item.arg_u32(0)?,
            "TailLength" => self.tail_length = item.arg_f32(0)?,
            "Time" => self.time = item.arg_f32(0)?,
            "SegmentColor" => self.segment_color = parse_segment_colors(item)?,
            "Alpha" => {
                let [a, b, c] = item.arg_vector::<3>(0)?;
                self.segment_alpha = [a, b, c].map(|v| v.clamp(0.0, 255.0).round() as u8);
            }
            "ParticleScaling" => self.segment_scaling = item.arg_vector::<3>(0)?,
            "LifeSpanUVAnim" => self.head_life_uv = SegmentUvAnim::parse(item)?,
            "DecayUVAnim" => self.head_decay_uv = SegmentUvAnim::parse(item)?,
            "TailUVAnim" => self.tail_life_uv = SegmentUvAnim::parse(item)?,
            "TailDecayUVAnim" => self.tail_decay_uv = SegmentUvAnim::parse(item)?,
            "TextureID" => self.texture_id = item.arg_usize(0)?,
            "ReplaceableId" => self.replaceable_id = item.arg_u32(0)?,
            "PriorityPlane" => self.priority_plane = item.arg_i64(0)? as i32,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        for (flag, keyword) in PE2_FLAG_KEYWORDS {
            w.flag(keyword, self.flags.contains(flag));
        }
        self.speed.write("Speed", w);
        self.variation.write("Variation", w);
        self.latitude.write("Latitude", w);
        self.gravity.write("Gravity", w);
        w.flag("Squirt", self.squirt);
        w.float("LifeSpan", self.life_span);
        self.emission_rate.write("EmissionRate", w);
        self.width.write("Width", w);
        self.height.write("Length", w);
        w.field(self.filter.keyword());
        w.int("Rows", self.rows);
        w.int("Columns", self.columns);
        w.field(self.head_tail.keyword());
        w.float("TailLength", self.tail_length);
        w.float("Time", self.time);
        w.open("SegmentColor");
        for color in &self.segment_color {
            w.keyed("Color", format_vector(&color.to_bgr()));
        }
        w.close();
        w.keyed("Alpha", format_int_list(&self.segment_alpha));
        w.vector("ParticleScaling", &self.segment_scaling);
        self.head_life_uv.write("LifeSpanUVAnim", w);
        self.head_decay_uv.write("DecayUVAnim", w);
        self.tail_life_uv.write("TailUVAnim", w);
        self.tail_decay_uv.write("TailDecayUVAnim", w);
        w.int("TextureID", self.texture_id);
        if self.replaceable_id != 0 {
            w.int("ReplaceableId", self.replaceable_id);
        }
        if self.priority_plane != 0 {
            w.int("PriorityPlane", self.priority_plane);
        }
    }
}

/// `SegmentColor { Color {b,g,r}, Color {..}, Color {..} }`
fn parse_segment_colors(item: &Item) -> Result<[Rgb; 3]> {
    let colors: Vec<&Item> = item.children()?.iter().filter(|c| c.is("Color")).collect();
    if colors.len() != 3 {
        return Err(MdlError::count_mismatch(item.pos, "SegmentColor", 3, colors.len()));
    }
    let mut out = [Rgb::WHITE; 3];
    for (dst, color) in out.iter_mut().zip(colors) {
        *dst = Rgb::from_bgr(color.arg_vector::<3>(0)?);
    }
    Ok(out)
}

/// Ribbon trail emitter
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RibbonEmitter {
    pub height_above: Animated<f32>,
    pub height_below: Animated<f32>,
    pub alpha: Animated<f32>,
    pub color: Animated<Rgb>,
    pub texture_slot: Animated<u32>,
    pub emission_rate: f32,
    pub life_span: f32,
    pub gravity: f32,
    pub rows: u32,
    pub columns: u32,
    /// Index into the document's materials
    pub material: usize,
}

impl Default for RibbonEmitter {
    fn default() -> Self {
        Self {
            height_above: Animated::Static(0.0),
            height_below: Animated::Static(0.0),
            alpha: Animated::Static(1.0),
            color: Animated::Static(Rgb::WHITE),
            texture_slot: Animated::Static(0),
            emission_rate: 0.0,
            life_span: 0.0,
            gravity: 0.0,
            rows: 1,
            columns: 1,
            material: 0,
        }
    }
}

impl RibbonEmitter {
    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("HeightAbove") => self.height_above = Animated::parse(item)?,
            Some("HeightBelow") => self.height_below = Animated::parse(item)?,
            Some("Alpha") => self.alpha = Animated::parse(item)?,
            Some("Color") => self.color = Animated::parse(item)?,
            Some("TextureSlot") => self.texture_slot = Animated::parse(item)?,
            Some("EmissionRate") => self.emission_rate = item.arg_f32(0)?,
            Some("LifeSpan") => self.life_span = item.arg_f32(0)?,
            Some("Gravity") => self.gravity = item.arg_f32(0)?,
            Some("Rows") => self.rows = item.arg_u32(0)?,
            Some("Columns") => self.columns = item.arg_u32(0)?,
            Some("MaterialID") => self.material = item.arg_usize(0)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        self.height_above.write("HeightAbove", w);
        self.height_below.write("HeightBelow", w);
        self.alpha.write("Alpha", w);
        self.color.write("Color", w);
        self.texture_slot.write("TextureSlot", w);
        w.keyed("EmissionRate", format_float(self.emission_rate));
        w.float("LifeSpan", self.life_span);
        w.float("Gravity", self.gravity);
        w.int("Rows", self.rows);
        w.int("Columns", self.columns);
        w.int("MaterialID", self.material);
    }
}
