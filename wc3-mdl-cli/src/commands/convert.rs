//! `convert` command: decode and re-encode in canonical form

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use wc3_mdl::{EncodeOptions, encode_with};

use crate::utils::{format_bytes, generation_comment};

/// Settings for [`execute`]
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub comment: Option<String>,
    pub no_timestamp: bool,
    pub validate: bool,
    pub strict: bool,
}

impl ConvertOptions {
    /// Comment line written at the top of the output, if any
    pub fn header_comment(&self) -> Option<String> {
        match &self.comment {
            Some(comment) => Some(comment.clone()),
            None if self.no_timestamp => None,
            None => Some(generation_comment(Local::now())),
        }
    }
}

pub fn execute(input: &Path, output: &Path, options: &ConvertOptions) -> Result<()> {
    let doc = super::load_model(input, options.strict)?;

    let encode_options = EncodeOptions {
        header_comment: options.header_comment(),
        validate: options.validate,
    };
    let text = encode_with(&doc, &encode_options)
        .with_context(|| format!("Failed to encode {}", input.display()))?;
    super::write_model(output, &text)?;

    info!("Wrote {} ({})", output.display(), format_bytes(text.len() as u64));
    println!("Converted {} -> {}", input.display(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_comment() {
        let explicit = ConvertOptions {
            comment: Some("Hand edited".to_string()),
            no_timestamp: true,
            ..ConvertOptions::default()
        };
        assert_eq!(explicit.header_comment().as_deref(), Some("Hand edited"));

        let bare = ConvertOptions {
            no_timestamp: true,
            ..ConvertOptions::default()
        };
        assert_eq!(bare.header_comment(), None);

        let stamped = ConvertOptions::default().header_comment().expect("timestamp");
        assert!(stamped.starts_with("MDL file generated by wc3mdl"));
    }
}
