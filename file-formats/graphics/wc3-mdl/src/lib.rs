//! Warcraft III MDL (text) model files.
//!
//! The crate reads MDL text into a [`Document`], writes a [`Document`] back
//! as MDL, checks documents with a [`Validator`], and reduces keyframe
//! counts with [`optimize`].
//!
//! ```
//! use wc3_mdl::{Document, chunks::Sequence};
//!
//! # fn main() -> wc3_mdl::Result<()> {
//! let mut doc = Document::new("Footman");
//! doc.sequences.push(Sequence::new("Stand", 0, 3333));
//!
//! let text = wc3_mdl::encode(&doc)?;
//! assert!(text.contains("Anim \"Stand\""));
//!
//! let decoded = wc3_mdl::decode(text.as_bytes())?;
//! assert_eq!(decoded, doc);
//! # Ok(())
//! # }
//! ```
//!
//! Rotations are [`glam::Quat`] in (x, y, z, w) order, the same order as on
//! the wire. Colors are [`geometry::Rgb`] in memory and reversed on the
//! wire. Coordinates and UVs are stored exactly as written in the file.

pub mod block;
pub mod chunks;
pub mod decoder;
pub mod document;
pub mod encoder;
pub mod error;
pub mod geometry;
pub mod lexer;
pub mod optimizer;
pub mod track;
pub mod validator;
pub mod writer;

use std::fs;
use std::path::Path;

pub use decoder::{DecodeOptions, decode, decode_with};
pub use document::{Document, FORMAT_VERSION, TrackVisitor};
pub use encoder::{EncodeOptions, encode, encode_with};
pub use error::{MdlError, Position, Result};
pub use optimizer::{OptimizeOptions, OptimizeReport, optimize, optimize_with};
pub use track::{AnimTrack, Animated, EventTrack, Interpolation, Keyframe, TrackValue};
pub use validator::{ValidationError, ValidationReport, ValidationWarning, Validator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Read and decode an MDL file
pub fn load<P: AsRef<Path>>(path: P) -> Result<Document> {
    let bytes = fs::read(path.as_ref())?;
    decode(&bytes)
}

/// Encode a document and write it to `path`
pub fn save<P: AsRef<Path>>(path: P, doc: &Document) -> Result<()> {
    let text = encode(doc)?;
    fs::write(path.as_ref(), text)?;
    Ok(())
}
