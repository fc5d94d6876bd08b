use glam::Vec3;
use log::debug;

use super::skip_unknown;
use crate::block::Item;
use crate::error::Result;
use crate::geometry::vec3;
use crate::track::AnimTrack;
use crate::writer::MdlWriter;

/// A `Camera` block. Cameras are not part of the node hierarchy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Camera {
    pub name: String,
    pub position: Vec3,
    pub target: Vec3,
    /// Radians
    pub field_of_view: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    pub translation: Option<AnimTrack<Vec3>>,
    /// Roll around the view axis
    pub rotation: Option<AnimTrack<f32>>,
    pub target_translation: Option<AnimTrack<Vec3>>,
}

impl Camera {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            field_of_view: std::f32::consts::FRAC_PI_4,
            near_clip: 8.0,
            far_clip: 1000.0,
            translation: None,
            rotation: None,
            target_translation: None,
        }
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let mut camera = Self::new(item.arg_str(0)?);
        for child in item.children()? {
            match child.keyword() {
                Some("Position") => camera.position = vec3(child.arg_vector(0)?),
                Some("FieldOfView") => camera.field_of_view = child.arg_f32(0)?,
                Some("NearClip") => camera.near_clip = child.arg_f32(0)?,
                Some("FarClip") => camera.far_clip = child.arg_f32(0)?,
                Some("Translation") => camera.translation = Some(AnimTrack::parse(child)?),
                Some("Rotation") => camera.rotation = Some(AnimTrack::parse(child)?),
                Some("Target") => {
                    for entry in child.children()? {
                        match entry.keyword() {
                            Some("Position") => camera.target = vec3(entry.arg_vector(0)?),
                            Some("Translation") => {
                                camera.target_translation = Some(AnimTrack::parse(entry)?);
                            }
                            _ => skip_unknown("Camera Target", entry),
                        }
                    }
                }
                _ => skip_unknown("Camera", child),
            }
        }
        debug!("Camera \"{}\"", camera.name);
        Ok(camera)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open(format!("Camera \"{}\"", self.name));
        w.vector("Position", &self.position.to_array());
        if let Some(track) = &self.translation {
            track.write("Translation", w);
        }
        if let Some(track) = &self.rotation {
            track.write("Rotation", w);
        }
        w.float("FieldOfView", self.field_of_view);
        w.float("FarClip", self.far_clip);
        w.float("NearClip", self.near_clip);
        w.open("Target");
        w.vector("Position", &self.target.to_array());
        if let Some(track) = &self.target_translation {
            track.write("Translation", w);
        }
        w.close();
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_items;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_camera_round_trip() {
        let mut camera = Camera::new("Portrait");
        camera.position = Vec3::new(120.0, 0.0, 80.0);
        camera.target = Vec3::new(0.0, 0.0, 60.0);
        camera.field_of_view = 0.7;
        camera.rotation = Some(AnimTrack::linear([(0, 0.0), (1000, 0.5)]));
        camera.target_translation = Some(AnimTrack::linear([(0, Vec3::ZERO)]));

        let mut w = MdlWriter::new();
        camera.write(&mut w);
        let items = parse_items(w.finish().as_bytes()).unwrap();
        assert_eq!(Camera::parse(&items[0]).unwrap(), camera);
    }
}
