//! Command implementations

pub mod convert;
#[cfg(feature = "serde")]
pub mod dump;
pub mod info;
pub mod optimize;
pub mod tree;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use wc3_mdl::{DecodeOptions, Document, decode_with};

/// Read and decode a model, honouring `--strict`
pub fn load_model(path: &Path, strict: bool) -> Result<Document> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let options = DecodeOptions {
        strict_version: strict,
        skip_unknown_chunks: !strict,
    };
    decode_with(&bytes, &options)
        .with_context(|| format!("Failed to parse MDL file: {}", path.display()))
}

/// Write encoded text, creating the parent directory if needed
pub fn write_model(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}
