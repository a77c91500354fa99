// ---------------------------------------------------------------------------
// Run parameters. `ReportConfig::default` reproduces the fixed analysis:
// input path, label rule, bin counts and the ten composite plots.
// ---------------------------------------------------------------------------

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::data::label::{LabelRule, CLASS_COLUMN};

pub const DEFAULT_INPUT: &str = "Pumpkin_Seeds_Dataset.xlsx";
pub const DEFAULT_OUTPUT_ROOT: &str = "EDA_graphs";

pub const USAGE: &str = "usage: pumpkin-eda [INPUT] [OUTPUT_ROOT]";

/// Subdirectories, one per reporter.
pub const DISTRIBUTION_DIR: &str = "Task1";
pub const MULTIMODAL_DIR: &str = "Task2";
pub const DISCRETENESS_DIR: &str = "Task3";
pub const COMPOSITE_DIR: &str = "Task4";

/// One declarative Task4 figure. `file` is the stem of the output PNG.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeSpec {
    /// Label class proportions as a pie with percentage annotations.
    ClassPie { file: String },
    /// Label class counts as bars.
    ClassBar { file: String },
    BoxPlot { file: String, feature: String },
    Scatter { file: String, x: String, y: String },
    /// Correlation over every numeric column.
    CorrelationHeatmap { file: String },
    PairGrid { file: String, features: Vec<String> },
    Violin { file: String, feature: String },
    /// One shaded density curve per label value.
    Kde { file: String, feature: String },
}

impl CompositeSpec {
    pub fn file(&self) -> &str {
        match self {
            CompositeSpec::ClassPie { file }
            | CompositeSpec::ClassBar { file }
            | CompositeSpec::BoxPlot { file, .. }
            | CompositeSpec::Scatter { file, .. }
            | CompositeSpec::CorrelationHeatmap { file }
            | CompositeSpec::PairGrid { file, .. }
            | CompositeSpec::Violin { file, .. }
            | CompositeSpec::Kde { file, .. } => file,
        }
    }

    /// Dataset columns this figure reads besides the label.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            CompositeSpec::ClassPie { .. }
            | CompositeSpec::ClassBar { .. }
            | CompositeSpec::CorrelationHeatmap { .. } => Vec::new(),
            CompositeSpec::BoxPlot { feature, .. }
            | CompositeSpec::Violin { feature, .. }
            | CompositeSpec::Kde { feature, .. } => vec![feature.as_str()],
            CompositeSpec::Scatter { x, y, .. } => vec![x.as_str(), y.as_str()],
            CompositeSpec::PairGrid { features, .. } => {
                features.iter().map(String::as_str).collect()
            }
        }
    }
}

/// The ten Task4 figures of the standard report.
pub fn default_composite_specs() -> Vec<CompositeSpec> {
    let s = |v: &str| v.to_string();
    vec![
        CompositeSpec::ClassPie {
            file: s("pie_target"),
        },
        CompositeSpec::ClassBar {
            file: s("bar_target"),
        },
        CompositeSpec::BoxPlot {
            file: s("box_area"),
            feature: s("Area"),
        },
        CompositeSpec::BoxPlot {
            file: s("box_perimeter"),
            feature: s("Perimeter"),
        },
        CompositeSpec::Scatter {
            file: s("scatter_area_perimeter"),
            x: s("Area"),
            y: s("Perimeter"),
        },
        CompositeSpec::Scatter {
            file: s("scatter_compactness_solidity"),
            x: s("Compactness"),
            y: s("Solidity"),
        },
        CompositeSpec::CorrelationHeatmap {
            file: s("heatmap_corr"),
        },
        CompositeSpec::PairGrid {
            file: s("pairplot"),
            features: vec![s("Area"), s("Perimeter"), s("Solidity")],
        },
        CompositeSpec::Violin {
            file: s("violin_solidity"),
            feature: s("Solidity"),
        },
        CompositeSpec::Kde {
            file: s("kde_aspect_ratio"),
            feature: s("Aspect_Ration"),
        },
    ]
}

/// Every parameter of a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub input_path: PathBuf,
    pub output_root: PathBuf,
    pub label: LabelRule,
    /// Original categorical label; excluded from the feature list.
    pub class_column: String,
    /// Bins of the per-label histograms (Task1, Task2).
    pub histogram_bins: usize,
    /// Bins of the unsplit discreteness histograms (Task3).
    pub fine_histogram_bins: usize,
    /// Rows shown in the console preview.
    pub preview_rows: usize,
    /// Print correlation values inside the heatmap cells.
    pub annotate_heatmap: bool,
    /// Draw only the lower triangle of the pair grid.
    pub pairgrid_corner: bool,
    /// Pixel size of single-panel figures.
    pub figure_size: (u32, u32),
    pub composite: Vec<CompositeSpec>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            label: LabelRule::default(),
            class_column: CLASS_COLUMN.to_string(),
            histogram_bins: 30,
            fine_histogram_bins: 50,
            preview_rows: 5,
            annotate_heatmap: false,
            pairgrid_corner: false,
            figure_size: (900, 600),
            composite: default_composite_specs(),
        }
    }
}

impl ReportConfig {
    /// Columns left out of the feature list.
    pub fn excluded_columns(&self) -> [&str; 2] {
        [self.class_column.as_str(), self.label.target_column.as_str()]
    }

    /// Apply positional command-line overrides: `[INPUT] [OUTPUT_ROOT]`.
    /// Flags and extra arguments are rejected with the usage line.
    pub fn with_args(mut self, args: impl Iterator<Item = String>) -> Result<Self> {
        for (i, arg) in args.enumerate() {
            if arg.starts_with('-') {
                bail!("unrecognized option '{arg}'\n{USAGE}");
            }
            match i {
                0 => self.input_path = PathBuf::from(arg),
                1 => self.output_root = PathBuf::from(arg),
                _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
            }
        }
        Ok(self)
    }
}
