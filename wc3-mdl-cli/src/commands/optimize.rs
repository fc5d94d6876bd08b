//! `optimize` command

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use wc3_mdl::{OptimizeOptions, encode, optimize_with};

use crate::cli::TrackKind;
use crate::utils::{add_table_row, create_table, format_reduction};

/// Optimizer settings for a tolerance and the track kinds to leave alone
pub fn options_for(tolerance: f32, skip: &[TrackKind]) -> Result<OptimizeOptions> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        anyhow::bail!("Tolerance must be a non-negative number, got {tolerance}");
    }
    Ok(OptimizeOptions {
        translation: !skip.contains(&TrackKind::Translation),
        rotation: !skip.contains(&TrackKind::Rotation),
        scaling: !skip.contains(&TrackKind::Scaling),
        ..OptimizeOptions::new(tolerance)
    })
}

pub fn execute(
    input: &Path,
    output: &Path,
    tolerance: f32,
    skip: &[TrackKind],
    strict: bool,
) -> Result<()> {
    let options = options_for(tolerance, skip)?;
    let mut doc = super::load_model(input, strict)?;

    let report = optimize_with(&mut doc, &options);
    info!(
        "Optimized {} track(s), {} changed",
        report.tracks, report.tracks_changed
    );

    let text = encode(&doc).with_context(|| format!("Failed to encode {}", input.display()))?;
    super::write_model(output, &text)?;

    let mut table = create_table(vec!["Tracks", "Changed", "Keys before", "Keys after", "Reduction"]);
    add_table_row(
        &mut table,
        vec![
            report.tracks.to_string(),
            report.tracks_changed.to_string(),
            report.keys_before.to_string(),
            report.keys_after.to_string(),
            format_reduction(report.keys_before, report.keys_after),
        ],
    );
    table.printstd();
    println!("Wrote {}", output.display());
    Ok(())
}
