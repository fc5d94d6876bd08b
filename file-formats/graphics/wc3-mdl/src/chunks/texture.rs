use super::skip_unknown;
use crate::block::Item;
use crate::error::Result;
use crate::writer::MdlWriter;

/// Where a texture's pixels come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextureSource {
    /// Image path, kept verbatim (back-slashes included). May be empty.
    Image(String),
    /// Substituted at runtime: 1 = team color, 2 = team glow, others are
    /// engine-defined
    Replaceable(u32),
}

/// A `Bitmap` entry. Wrap flags are not modelled; both are always written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub source: TextureSource,
}

impl Texture {
    pub fn image(path: impl Into<String>) -> Self {
        Self {
            source: TextureSource::Image(path.into()),
        }
    }

    pub fn replaceable(id: u32) -> Self {
        Self {
            source: TextureSource::Replaceable(id),
        }
    }

    pub fn path(&self) -> &str {
        match &self.source {
            TextureSource::Image(path) => path,
            TextureSource::Replaceable(_) => "",
        }
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let mut path = String::new();
        let mut replaceable_id = 0;
        for child in item.children()? {
            match child.keyword() {
                Some("Image") => path = child.arg_str(0)?.to_string(),
                Some("ReplaceableId") => replaceable_id = child.arg_u32(0)?,
                Some("WrapWidth" | "WrapHeight") => {}
                _ => skip_unknown("Bitmap", child),
            }
        }

        // A replaceable texture has no image of its own
        let source = if replaceable_id == 0 {
            TextureSource::Image(path)
        } else {
            TextureSource::Replaceable(replaceable_id)
        };
        Ok(Self { source })
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open("Bitmap");
        w.quoted("Image", self.path());
        if let TextureSource::Replaceable(id) = self.source {
            w.int("ReplaceableId", id);
        }
        w.field("WrapHeight");
        w.field("WrapWidth");
        w.close();
    }
}
