//! Statistics Calculator Module
//! Descriptive statistics, boxplot summaries and histogram binning.

use statrs::statistics::Statistics;

/// Whisker reach in interquartile ranges (matplotlib default).
pub const WHISKER_IQR: f64 = 1.5;

/// Descriptive statistics for one numeric field.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, undefined below two values
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: None,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Five-number boxplot summary with outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub whisker_low: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// One histogram bin; `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> SummaryStats {
        let n = values.len();
        if n == 0 {
            return SummaryStats::default();
        }

        let sorted = Self::sorted(values);
        let mean = values.iter().mean();
        let std = (n > 1).then(|| values.iter().std_dev());

        SummaryStats {
            count: n,
            mean,
            std,
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Boxplot summary: whiskers reach the most extreme values within
    /// 1.5 IQR of the box, everything beyond is an outlier.
    pub fn compute_box_stats(values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);

        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_low || v > whisker_high)
            .collect();

        Some(BoxStats {
            whisker_low,
            q1,
            median,
            q3,
            whisker_high,
            outliers,
        })
    }

    /// Equal-width histogram over [min, max], last bin closed (NumPy compatible).
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let sorted = Self::sorted(values);
        let (mut first, mut last) = (sorted[0], sorted[sorted.len() - 1]);
        if first == last {
            first -= 0.5;
            last += 0.5;
        }

        let width = (last - first) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in &sorted {
            let idx = (((v - first) / (last - first)) * bins as f64).floor() as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: first + i as f64 * width,
                upper: if i + 1 == bins {
                    last
                } else {
                    first + (i + 1) as f64 * width
                },
                count,
            })
            .collect()
    }

    /// Round to two decimals, ties to even (NumPy `around`).
    pub fn round2(value: f64) -> f64 {
        (value * 100.0).round_ties_even() / 100.0
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }
}
