// ---------------------------------------------------------------------------
// Straight-line batch run: load, label, summarize, then every reporter in turn.
// ---------------------------------------------------------------------------

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{
    ReportConfig, COMPOSITE_DIR, DISCRETENESS_DIR, DISTRIBUTION_DIR, MULTIMODAL_DIR,
};
use crate::data::label::derive_target;
use crate::data::loader::load_file;
use crate::plot::Renderer;
use crate::report::{composite, discreteness, distribution, multimodal, summary};

/// Files written by each stage.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub distribution: Vec<PathBuf>,
    pub multimodal: Vec<PathBuf>,
    pub discreteness: Vec<PathBuf>,
    pub composite: Vec<PathBuf>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.distribution.len() + self.multimodal.len() + self.discreteness.len() + self.composite.len()
    }
}

/// Create `<root>/<name>` if absent and return it.
fn stage_dir(root: &Path, name: &str) -> Result<PathBuf> {
    let dir = root.join(name);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    Ok(dir)
}

pub fn run(config: &ReportConfig, renderer: &dyn Renderer) -> Result<RunSummary> {
    let raw = load_file(&config.input_path)?;
    let dataset = derive_target(&raw, &config.label)
        .with_context(|| format!("labelling {}", config.input_path.display()))?;
    if dataset.is_empty() {
        warn!("{} has no data rows", config.input_path.display());
    }

    summary::print(&dataset, config)?;

    let root = &config.output_root;
    let mut result = RunSummary::default();

    let dir = stage_dir(root, DISTRIBUTION_DIR)?;
    result.distribution = distribution::run(&dataset, config, renderer, &dir)?;

    let dir = stage_dir(root, MULTIMODAL_DIR)?;
    result.multimodal = multimodal::run(&dataset, config, renderer, &dir)?;

    let dir = stage_dir(root, DISCRETENESS_DIR)?;
    result.discreteness = discreteness::run(&dataset, config, renderer, &dir)?;

    let dir = stage_dir(root, COMPOSITE_DIR)?;
    result.composite = composite::run(&dataset, config, renderer, &dir)?;

    info!("Run finished: {} files written", result.total());
    println!("All plots saved under '{}/Task1-Task4'.", root.display());
    Ok(result)
}
