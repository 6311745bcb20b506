//! Statistics Calculator Module
//! Descriptive statistics for the report and binning for the histogram.

/// Descriptive statistics over a set of GDP values.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Compute descriptive statistics for an array of values.
///
/// Standard deviation is the sample (n-1) form; an empty input yields the
/// NaN-filled default.
pub fn compute_descriptive_stats(values: &[f64]) -> DescriptiveStats {
    let n = values.len();
    if n == 0 {
        return DescriptiveStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    let variance = if n > 1 {
        values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    } else {
        0.0
    };

    DescriptiveStats {
        count: n,
        mean,
        median,
        std: variance.sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
    }
}

/// One equal-width histogram bin over `[lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Bin values into `bins` equal-width buckets spanning `[min, max]`.
///
/// The maximum value lands in the last bin. A single distinct value gets
/// unit-width bins so the chart still has an x-extent.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };

    let mut counts = vec![0usize; bins];
    for &value in values {
        let mut idx = ((value - min) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_stats_even_count() {
        let stats = compute_descriptive_stats(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-12);
        assert!((stats.median - 2.5).abs() < 1e-12);
        assert!((stats.min - 1.0).abs() < 1e-12);
        assert!((stats.max - 4.0).abs() < 1e-12);
        // Sample variance of 1..4 is 5/3.
        assert!((stats.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn descriptive_stats_odd_count_median() {
        let stats = compute_descriptive_stats(&[9.0, 1.0, 5.0]);
        assert!((stats.median - 5.0).abs() < 1e-12);
    }

    #[test]
    fn descriptive_stats_empty_is_nan() {
        let stats = compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn histogram_counts_sum_to_input_length() {
        let values = [1.0, 2.0, 2.5, 3.0, 9.9, 10.0];
        let bins = histogram(&values, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // Maximum value lands in the last bin, not past it.
        assert_eq!(bins.last().unwrap().count, 2);
    }

    #[test]
    fn histogram_single_value_uses_unit_width() {
        let bins = histogram(&[7.0, 7.0], 4);

        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!((bins[0].upper - bins[0].lower - 1.0).abs() < 1e-12);
        assert_eq!(bins[0].count, 2);
    }
}
