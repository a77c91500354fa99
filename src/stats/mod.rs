/// Statistics behind the report figures: modes and cardinality, quartiles and
/// box summaries, equal-width histograms, Gaussian KDE and Pearson correlation.

pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod kde;
