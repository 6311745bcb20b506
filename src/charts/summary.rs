//! Report Summary Module
//! The textual final report printed to stdout and drawn under the pie chart.

use crate::config::Config;
use crate::stats::{compute_descriptive_stats, DescriptiveStats};

/// The final report for one pipeline run.
#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub region: String,
    pub year: String,
    pub operation: String,
    pub result: f64,
    pub stats: DescriptiveStats,
}

impl ReportSummary {
    pub fn new(config: &Config, series: &[(String, f64)], result: f64) -> Self {
        let values: Vec<f64> = series.iter().map(|(_, value)| *value).collect();

        Self {
            region: config.region.clone(),
            year: config.year.to_string(),
            operation: config.operation.clone(),
            result,
            stats: compute_descriptive_stats(&values),
        }
    }

    pub fn report_lines(&self) -> Vec<String> {
        vec![
            "=== FINAL REPORT ===".to_string(),
            format!("REGION: {}", self.region),
            format!("YEAR: {}", self.year),
            format!("OPERATION: {}", self.operation.to_uppercase()),
            format!("RESULT: {}", format_usd(self.result)),
            format!("COUNTRIES: {}", self.stats.count),
            format!(
                "MEAN: {}   MEDIAN: {}",
                format_usd(self.stats.mean),
                format_usd(self.stats.median)
            ),
            format!(
                "MIN: {}   MAX: {}",
                format_usd(self.stats.min),
                format_usd(self.stats.max)
            ),
        ]
    }

    pub fn to_text(&self) -> String {
        self.report_lines().join("\n")
    }
}

/// Format a dollar amount with thousands separators and two decimals.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(0.5), "$0.50");
        assert_eq!(format_usd(-1_000.0), "-$1,000.00");
        assert_eq!(format_usd(999.0), "$999.00");
    }

    #[test]
    fn report_carries_result_and_stats() {
        let config: Config = serde_json::from_str(
            r#"{"region": "Asia", "year": 2000, "operation": "sum", "output": "dashboard"}"#,
        )
        .unwrap();
        let series = vec![("A".to_string(), 10.0), ("B".to_string(), 30.0)];

        let summary = ReportSummary::new(&config, &series, 40.0);
        let text = summary.to_text();

        assert!(text.contains("REGION: Asia"));
        assert!(text.contains("OPERATION: SUM"));
        assert!(text.contains("RESULT: $40.00"));
        assert!(text.contains("COUNTRIES: 2"));
        assert!(text.contains("MEAN: $20.00"));
    }
}
