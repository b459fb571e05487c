//! Stats module - descriptive statistics and per-class aggregates

mod aggregate;
mod calculator;

pub use aggregate::{
    class_boxes, global_summary, group_summary, long_form, ClassBox, ClassIndicators,
    GlobalSummary, LongScore,
};
pub use calculator::{BoxStats, HistogramBin, StatsCalculator, SummaryStats};
