//! `validate` command

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use log::{debug, warn};
use wc3_mdl::{ValidationReport, Validator};

use crate::utils::create_progress_bar;

/// Expand glob patterns; plain paths pass through even when they do not exist
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched = false;
        for entry in
            glob::glob(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?
        {
            match entry {
                Ok(path) if path.is_file() => {
                    files.push(path);
                    matched = true;
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {e}"),
            }
        }
        if !matched {
            files.push(PathBuf::from(pattern));
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

pub fn execute(patterns: &[String], show_warnings: bool, strict: bool, quiet: bool) -> Result<()> {
    let files = expand_patterns(patterns)?;
    debug!("Validating {} file(s)", files.len());

    let pb = create_progress_bar(files.len() as u64, "Validating", quiet || files.len() < 2);
    let validator = Validator::new();
    let mut results: Vec<(PathBuf, Result<ValidationReport>)> = Vec::with_capacity(files.len());

    for path in files {
        pb.set_message(path.display().to_string());
        let result = super::load_model(&path, strict).map(|doc| validator.validate(&doc));
        results.push((path, result));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(report) if !report.has_errors() => {
                if !quiet {
                    println!("{} {}", style("✓").green(), path.display());
                }
                if show_warnings {
                    for warning in &report.warnings {
                        println!("    {} {warning}", style("⚠").yellow());
                    }
                }
            }
            Ok(report) => {
                failed += 1;
                println!("{} {}", style("✗").red(), path.display());
                for error in &report.errors {
                    println!("    {} {error}", style("✗").red());
                }
                if show_warnings {
                    for warning in &report.warnings {
                        println!("    {} {warning}", style("⚠").yellow());
                    }
                }
            }
            Err(e) => {
                failed += 1;
                println!("{} {}", style("✗").red(), path.display());
                println!("    {e:#}");
            }
        }
    }

    if !quiet {
        println!(
            "\n{} file(s) checked, {} valid, {} invalid",
            results.len(),
            results.len() - failed,
            failed
        );
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} file(s) failed validation", results.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_patterns() {
        let dir = tempfile::tempdir().expect("temp dir");
        for name in ["a.mdl", "b.mdl", "c.txt"] {
            std::fs::write(dir.path().join(name), "").expect("write");
        }
        let pattern = dir.path().join("*.mdl").display().to_string();
        let files = expand_patterns(&[pattern]).expect("expand");
        let names: Vec<_> = files
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.mdl", "b.mdl"]);
    }

    #[test]
    fn test_unmatched_pattern_is_kept() {
        let files = expand_patterns(&["does/not/exist.mdl".to_string()]).expect("expand");
        assert_eq!(files, vec![PathBuf::from("does/not/exist.mdl")]);
    }
}
