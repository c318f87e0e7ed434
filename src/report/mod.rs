//! Threshold evaluation and the end-of-run JSON summary.
mod summary;
mod thresholds;

pub use summary::{CheckCounts, SummaryDocument, build_summary};
pub use thresholds::{
    Comparator, Threshold, ThresholdMetric, ThresholdResult, evaluate_thresholds,
};
