use std::fmt;

use crate::block::Item;
use crate::error::Result;
use crate::geometry::Rgb;
use crate::track::Animated;
use crate::writer::MdlWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LightType {
    #[default]
    Omnidirectional,
    Directional,
    Ambient,
}

impl LightType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Omnidirectional" => Some(Self::Omnidirectional),
            "Directional" => Some(Self::Directional),
            "Ambient" => Some(Self::Ambient),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Omnidirectional => "Omnidirectional",
            Self::Directional => "Directional",
            Self::Ambient => "Ambient",
        }
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Light payload of a node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Light {
    pub light_type: LightType,
    pub attenuation_start: Animated<f32>,
    pub attenuation_end: Animated<f32>,
    pub color: Animated<Rgb>,
    pub intensity: Animated<f32>,
    pub ambient_color: Animated<Rgb>,
    pub ambient_intensity: Animated<f32>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Omnidirectional,
            attenuation_start: Animated::Static(0.0),
            attenuation_end: Animated::Static(0.0),
            color: Animated::Static(Rgb::WHITE),
            intensity: Animated::Static(1.0),
            ambient_color: Animated::Static(Rgb::WHITE),
            ambient_intensity: Animated::Static(0.0),
        }
    }
}

impl Light {
    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        let Some(keyword) = item.keyword() else {
            return Ok(false);
        };
        if let Some(light_type) = LightType::from_keyword(keyword) {
            self.light_type = light_type;
            return Ok(true);
        }
        match keyword {
            "AttenuationStart" => self.attenuation_start = Animated::parse(item)?,
            "AttenuationEnd" => self.attenuation_end = Animated::parse(item)?,
            "Color" => self.color = Animated::parse(item)?,
            "Intensity" => self.intensity = Animated::parse(item)?,
            "AmbColor" => self.ambient_color = Animated::parse(item)?,
            "AmbIntensity" => self.ambient_intensity = Animated::parse(item)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        w.field(self.light_type.keyword());
        self.attenuation_start.write("AttenuationStart", w);
        self.attenuation_end.write("AttenuationEnd", w);
        self.intensity.write("Intensity", w);
        self.color.write("Color", w);
        self.ambient_intensity.write("AmbIntensity", w);
        self.ambient_color.write("AmbColor", w);
    }
}
