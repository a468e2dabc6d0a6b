//! Analyze command implementation.

use anyhow::{Context, Result};
use clap::ValueEnum;
use dtrac_core::{Analysis, ClassMap};
use std::path::Path;

use crate::depfile_loader;
use crate::OutputFormat;

/// Runs the analyze command. Returns `Ok(false)` if violations were found.
pub fn run(
    path: &Path,
    class_map: Option<&Path>,
    format: Option<OutputFormat>,
    config: Option<&Path>,
) -> Result<bool> {
    let loaded = depfile_loader::load(path, config)?;
    let format = match format {
        Some(f) => f,
        None => configured_format(loaded.depfile.analyzer.formatter.as_deref())?,
    };

    let class_map_path = loaded.class_map_path(class_map);
    tracing::info!("Loading class map {}", class_map_path.display());
    let class_map = ClassMap::from_file(&class_map_path)
        .with_context(|| format!("Failed to load class map: {}", class_map_path.display()))?;

    let analysis = Analysis::new(loaded.depfile);
    let report = analysis.run(&class_map).with_context(|| {
        format!("Invalid {} depfile: {}", loaded.origin, loaded.path.display())
    })?;

    super::output::print(&report, analysis.depfile(), format)?;

    Ok(report.is_clean())
}

fn configured_format(name: Option<&str>) -> Result<OutputFormat> {
    match name {
        None => Ok(OutputFormat::default()),
        Some(name) => OutputFormat::from_str(name, true)
            .map_err(|e| anyhow::anyhow!("[analyzer] formatter: {e}")),
    }
}
