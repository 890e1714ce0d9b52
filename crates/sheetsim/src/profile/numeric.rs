//! Numeric column patterns: range, skewness, and IQR outliers.

use serde::{Deserialize, Serialize};

/// How quantiles are read off the sorted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantileMethod {
    /// Linear interpolation between the two closest ranks.
    #[default]
    Linear,
    /// The lower of the two closest ranks.
    Lower,
}

/// Shape of a numeric distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    /// `|skewness| < 1`.
    Normal,
    Skewed,
}

impl Distribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Distribution::Normal => "normal",
            Distribution::Skewed => "skewed",
        }
    }
}

/// Observed minimum and maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Values falling outside the IQR fences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub count: usize,
    /// Share of numeric values, in percent.
    pub percentage: f64,
    /// Outlying values in row order.
    pub values: Vec<f64>,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Kind-specific profile of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericPatterns {
    pub range: NumericRange,
    pub distribution: Distribution,
    pub skewness: f64,
    pub q1: f64,
    pub q3: f64,
    pub outliers: OutlierSummary,
}

/// Describe-style statistics for a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for a single value.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summarize a non-empty slice; `None` when empty.
    pub fn from_values(values: &[f64], method: QuantileMethod) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let n = values.len() as f64;
        let mean = mean(values);
        let std = if values.len() > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count: values.len(),
            mean,
            std,
            min: sorted[0],
            q1: sorted_quantile(&sorted, 0.25, method),
            median: sorted_quantile(&sorted, 0.5, QuantileMethod::Linear),
            q3: sorted_quantile(&sorted, 0.75, method),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Arithmetic mean using a running update.
fn mean(values: &[f64]) -> f64 {
    let mut mean = 0.0;
    for (i, v) in values.iter().enumerate() {
        mean += (v - mean) / (i + 1) as f64;
    }
    mean
}

/// Quantile `p` in `[0, 1]` of an ascending slice; `None` when empty.
pub fn quantile(sorted: &[f64], p: f64, method: QuantileMethod) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted_quantile(sorted, p, method))
}

/// Quantile of a slice already known to be non-empty.
fn sorted_quantile(sorted: &[f64], p: f64, method: QuantileMethod) -> f64 {
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    match method {
        QuantileMethod::Lower => sorted[lo],
        QuantileMethod::Linear => {
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// Bias-adjusted sample skewness (third standardized moment).
///
/// Returns 0 for fewer than three values or a constant sample.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 3 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = mean(values);
    let (mut m2, mut m3) = (0.0, 0.0);
    for v in values {
        let d = v - mean;
        m2 += d * d;
        m3 += d * d * d;
    }
    m2 /= nf;
    m3 /= nf;

    if m2.sqrt() <= 1e-12 * mean.abs().max(1.0) {
        return 0.0;
    }

    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

/// Profile a non-empty set of numeric values.
pub(crate) fn numeric_patterns(
    values: &[f64],
    multiplier: f64,
    method: QuantileMethod,
) -> NumericPatterns {
    let sorted = sorted(values);
    let q1 = sorted_quantile(&sorted, 0.25, method);
    let q3 = sorted_quantile(&sorted, 0.75, method);
    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    let outlying: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&v| v < lower_bound || v > upper_bound)
        .collect();

    let skewness = skewness(values);
    let distribution = if skewness.abs() < 1.0 {
        Distribution::Normal
    } else {
        Distribution::Skewed
    };

    NumericPatterns {
        range: NumericRange {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        },
        distribution,
        skewness,
        q1,
        q3,
        outliers: OutlierSummary {
            count: outlying.len(),
            percentage: outlying.len() as f64 / values.len() as f64 * 100.0,
            values: outlying,
            lower_bound,
            upper_bound,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];

    #[test]
    fn test_linear_quartiles() {
        let sorted = sorted(&SAMPLE);
        assert_eq!(quantile(&sorted, 0.25, QuantileMethod::Linear), Some(2.25));
        assert_eq!(quantile(&sorted, 0.75, QuantileMethod::Linear), Some(4.75));
        assert_eq!(quantile(&sorted, 0.5, QuantileMethod::Linear), Some(3.5));
    }

    #[test]
    fn test_lower_quartiles() {
        let sorted = sorted(&SAMPLE);
        assert_eq!(quantile(&sorted, 0.25, QuantileMethod::Lower), Some(2.0));
        assert_eq!(quantile(&sorted, 0.75, QuantileMethod::Lower), Some(4.0));
    }

    #[test]
    fn test_quantile_of_empty_slice() {
        assert_eq!(quantile(&[], 0.5, QuantileMethod::Linear), None);
        assert_eq!(quantile(&[], 0.25, QuantileMethod::Lower), None);
        assert_eq!(quantile(&[7.0], 0.75, QuantileMethod::Linear), Some(7.0));
    }

    #[test]
    fn test_outlier_flagged() {
        for method in [QuantileMethod::Linear, QuantileMethod::Lower] {
            let patterns = numeric_patterns(&SAMPLE, 1.5, method);
            assert_eq!(patterns.outliers.values, vec![100.0]);
            assert_eq!(patterns.outliers.count, 1);
            assert!((patterns.outliers.percentage - 100.0 / 6.0).abs() < 1e-9);
        }
        let lower = numeric_patterns(&SAMPLE, 1.5, QuantileMethod::Lower);
        assert_eq!(lower.outliers.upper_bound, 7.0);
        assert_eq!(lower.outliers.lower_bound, -1.0);
    }

    #[test]
    fn test_values_within_fences_not_flagged() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0];
        let patterns = numeric_patterns(&values, 1.5, QuantileMethod::Linear);
        assert_eq!(patterns.outliers.count, 0);
        assert_eq!(patterns.outliers.percentage, 0.0);
        assert_eq!(patterns.range, NumericRange { min: 10.0, max: 14.0 });
    }

    #[test]
    fn test_skewness() {
        assert_eq!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0);
        assert!(skewness(&SAMPLE) > 1.0);
        assert_eq!(skewness(&[5.0, 5.0, 5.0]), 0.0);
        assert_eq!(skewness(&[1.0, 9.0]), 0.0);
    }

    #[test]
    fn test_distribution() {
        let skewed = numeric_patterns(&SAMPLE, 1.5, QuantileMethod::Linear);
        assert_eq!(skewed.distribution, Distribution::Skewed);
        let symmetric = numeric_patterns(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.5, QuantileMethod::Linear);
        assert_eq!(symmetric.distribution, Distribution::Normal);
    }

    #[test]
    fn test_summary() {
        let summary = NumericSummary::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], QuantileMethod::Linear)
            .unwrap();
        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
        assert_eq!(summary.median, 4.5);
        assert!((summary.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!(NumericSummary::from_values(&[], QuantileMethod::Linear).is_none());
    }
}
