use glam::Vec3;

use crate::block::Item;
use crate::error::{MdlError, Result};
use crate::geometry::vec3;
use crate::writer::{MdlWriter, format_vector};

/// Hit-test primitive of a `CollisionShape` node
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollisionShape {
    Box { min: Vec3, max: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Default for CollisionShape {
    fn default() -> Self {
        Self::Sphere {
            center: Vec3::ZERO,
            radius: 0.0,
        }
    }
}

impl CollisionShape {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Box { .. } => "Box",
            Self::Sphere { .. } => "Sphere",
        }
    }

    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        match item.keyword() {
            Some("Box") => {
                if !matches!(self, Self::Box { .. }) {
                    *self = Self::Box {
                        min: Vec3::ZERO,
                        max: Vec3::ZERO,
                    };
                }
            }
            Some("Sphere") => {
                if !matches!(self, Self::Sphere { .. }) {
                    *self = Self::default();
                }
            }
            Some("Vertices") => {
                let declared = item.arg_usize(0)?;
                let vertices = item.vector_children::<3>()?;
                if vertices.len() != declared {
                    return Err(MdlError::count_mismatch(
                        item.pos,
                        "Vertices",
                        declared,
                        vertices.len(),
                    ));
                }
                let expected = match self {
                    Self::Box { .. } => 2,
                    Self::Sphere { .. } => 1,
                };
                if vertices.len() != expected {
                    return Err(MdlError::count_mismatch(
                        item.pos,
                        format!("{} vertices", self.keyword()),
                        expected,
                        vertices.len(),
                    ));
                }
                match self {
                    Self::Box { min, max } => {
                        *min = vec3(vertices[0]);
                        *max = vec3(vertices[1]);
                    }
                    Self::Sphere { center, .. } => *center = vec3(vertices[0]),
                }
            }
            Some("BoundsRadius") => {
                if let Self::Sphere { radius, .. } = self {
                    *radius = item.arg_f32(0)?;
                }
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        w.field(self.keyword());
        match self {
            Self::Box { min, max } => {
                w.open("Vertices 2");
                w.field(format_vector(&min.to_array()));
                w.field(format_vector(&max.to_array()));
                w.close();
            }
            Self::Sphere { center, radius } => {
                w.open("Vertices 1");
                w.field(format_vector(&center.to_array()));
                w.close();
                w.float("BoundsRadius", *radius);
            }
        }
    }
}
