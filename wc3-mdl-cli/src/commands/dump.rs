//! `dump` command: the decoded document as JSON

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute(path: &Path, compact: bool, strict: bool) -> Result<()> {
    let doc = super::load_model(path, strict)?;
    let json = if compact {
        serde_json::to_string(&doc)
    } else {
        serde_json::to_string_pretty(&doc)
    }
    .context("Failed to serialize model")?;
    println!("{json}");
    Ok(())
}
