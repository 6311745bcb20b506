//! Chart Renderer Module
//! Renders the four dashboard artifacts with plotters.
//!
//! Sequence:
//! 1. Horizontal bar chart of GDP by country (sorted ascending)
//! 2. Histogram of the GDP distribution
//! 3. Dot plot with stems, same ordering as the bar chart
//! 4. Share-of-total pie (top slices + "Others") with the final report below
//!
//! One drawing path serves both backends; render mode decides whether each
//! saved artifact is also opened with the system viewer.

use plotters::coord::ranged1d::SegmentValue;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use polars::prelude::PolarsError;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{ChartBackend, RenderMode};
use crate::stats;

use super::ReportSummary;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Render(String),
    #[error("chart I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

fn render_err(err: impl std::fmt::Display) -> ChartError {
    ChartError::Render(err.to_string())
}

// Colors matching the original dashboard
const TEAL: RGBColor = RGBColor(0, 128, 128);
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const PLUM: RGBColor = RGBColor(128, 0, 128);
const STEM_GRAY: RGBColor = RGBColor(170, 170, 170);

/// Slice palette for the pie chart.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(46, 204, 113), // Green
    RGBColor(155, 89, 182), // Purple
    RGBColor(243, 156, 18), // Orange
    RGBColor(26, 188, 156), // Teal
    RGBColor(233, 30, 99),  // Pink
    RGBColor(0, 188, 212),  // Cyan
    RGBColor(255, 87, 34),  // Deep Orange
    RGBColor(121, 85, 72),  // Brown
    RGBColor(96, 125, 139), // Blue Grey
];

const HIST_BINS: usize = 10;
/// Pie slices beyond this count collapse into "Others".
const TOP_SLICES: usize = 8;

#[derive(Debug, Clone, Copy)]
enum ChartKind {
    Bar,
    Histogram,
    Dot,
    Pie,
}

/// Renders the dashboard artifacts into an output directory.
pub struct ChartRenderer {
    mode: RenderMode,
    backend: ChartBackend,
    out_dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(mode: RenderMode, backend: ChartBackend, out_dir: &Path) -> Self {
        Self {
            mode,
            backend,
            out_dir: out_dir.to_path_buf(),
        }
    }

    /// Render all four charts in sequence and return the written paths.
    pub fn render_dashboard(
        &self,
        series: &[(String, f64)],
        summary: &ReportSummary,
    ) -> Result<Vec<PathBuf>, ChartError> {
        if series.is_empty() {
            warn!("no rows to chart; skipping dashboard");
            return Ok(Vec::new());
        }

        fs::create_dir_all(&self.out_dir)?;

        // Sort once for the bar and dot plots.
        let mut sorted = series.to_vec();
        sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let charts = [
            (ChartKind::Bar, "01_bar"),
            (ChartKind::Histogram, "02_hist"),
            (ChartKind::Dot, "03_dot"),
            (ChartKind::Pie, "04_pie"),
        ];

        let mut paths = Vec::with_capacity(charts.len());
        for (kind, prefix) in charts {
            let file = self.out_dir.join(format!(
                "{}_{}_{}.{}",
                prefix,
                summary.region,
                summary.year,
                self.backend.extension()
            ));
            self.render_one(kind, &file, &sorted, series, summary)?;

            if self.mode == RenderMode::Interactive {
                info!("opening {}", file.display());
                open::that(&file)?;
            }
            paths.push(file);
        }

        Ok(paths)
    }

    fn dimensions(kind: ChartKind) -> (u32, u32) {
        match kind {
            ChartKind::Histogram => (1000, 640),
            ChartKind::Pie => (1000, 900),
            _ => (1200, 800),
        }
    }

    fn render_one(
        &self,
        kind: ChartKind,
        path: &Path,
        sorted: &[(String, f64)],
        raw: &[(String, f64)],
        summary: &ReportSummary,
    ) -> Result<(), ChartError> {
        match self.backend {
            ChartBackend::Png => {
                let root = BitMapBackend::new(path, Self::dimensions(kind)).into_drawing_area();
                Self::draw(kind, &root, sorted, raw, summary)?;
                root.present().map_err(render_err)?;
            }
            ChartBackend::Svg => {
                let root = SVGBackend::new(path, Self::dimensions(kind)).into_drawing_area();
                Self::draw(kind, &root, sorted, raw, summary)?;
                root.present().map_err(render_err)?;
            }
        }
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        kind: ChartKind,
        root: &DrawingArea<DB, Shift>,
        sorted: &[(String, f64)],
        raw: &[(String, f64)],
        summary: &ReportSummary,
    ) -> Result<(), ChartError> {
        match kind {
            ChartKind::Bar => {
                let title = format!("GDP Comparison: {} ({})", summary.region, summary.year);
                Self::draw_bar(root, sorted, &title)
            }
            ChartKind::Histogram => {
                let values: Vec<f64> = raw.iter().map(|r| r.1).collect();
                Self::draw_histogram(root, &values, "GDP Distribution Frequency")
            }
            ChartKind::Dot => Self::draw_dot(root, sorted, "GDP Values (Dot Plot)"),
            ChartKind::Pie => Self::draw_pie(root, raw, summary, "GDP Market Share"),
        }
    }

    fn draw_bar<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        rows: &[(String, f64)],
        title: &str,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE).map_err(render_err)?;

        let n = rows.len() as u32;
        let x_max = axis_max(rows.iter().map(|r| r.1));

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(46)
            .y_label_area_size(150)
            .build_cartesian_2d(0f64..x_max, (0u32..n).into_segmented())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.len())
            .y_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) => rows
                    .get(*i as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("GDP (US$)")
            .x_label_formatter(&|v| format_axis(*v))
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(rows.iter().enumerate().map(|(i, (_, value))| {
                Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(i as u32)),
                        (*value, SegmentValue::Exact(i as u32 + 1)),
                    ],
                    TEAL.filled(),
                )
            }))
            .map_err(render_err)?;

        Ok(())
    }

    fn draw_histogram<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        values: &[f64],
        title: &str,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE).map_err(render_err)?;

        let bins = stats::histogram(values, HIST_BINS);
        let x_min = bins.first().map(|b| b.lower).unwrap_or(0.0);
        let x_max = bins.last().map(|b| b.upper).unwrap_or(1.0);
        let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0) as u32 + 1;

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(46)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0u32..y_max)
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("GDP Range")
            .y_desc("Count of Countries")
            .x_label_formatter(&|v| format_axis(*v))
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(bins.iter().map(|bin| {
                Rectangle::new(
                    [(bin.lower, 0), (bin.upper, bin.count as u32)],
                    SKY_BLUE.filled(),
                )
            }))
            .map_err(render_err)?;
        // Black edge on each bar
        chart
            .draw_series(
                bins.iter().map(|bin| {
                    Rectangle::new([(bin.lower, 0), (bin.upper, bin.count as u32)], BLACK)
                }),
            )
            .map_err(render_err)?;

        Ok(())
    }

    fn draw_dot<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        rows: &[(String, f64)],
        title: &str,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE).map_err(render_err)?;

        let n = rows.len() as u32;
        let x_max = axis_max(rows.iter().map(|r| r.1));

        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 28))
            .margin(12)
            .x_label_area_size(46)
            .y_label_area_size(150)
            .build_cartesian_2d(0f64..x_max, (0u32..n).into_segmented())
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.len())
            .y_label_formatter(&|segment| match segment {
                SegmentValue::CenterOf(i) => rows
                    .get(*i as usize)
                    .map(|(name, _)| name.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_desc("GDP (US$)")
            .x_label_formatter(&|v| format_axis(*v))
            .label_style(("sans-serif", 12))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(rows.iter().enumerate().map(|(i, (_, value))| {
                PathElement::new(
                    vec![
                        (0.0, SegmentValue::CenterOf(i as u32)),
                        (*value, SegmentValue::CenterOf(i as u32)),
                    ],
                    STEM_GRAY,
                )
            }))
            .map_err(render_err)?;
        chart
            .draw_series(rows.iter().enumerate().map(|(i, (_, value))| {
                Circle::new(
                    (*value, SegmentValue::CenterOf(i as u32)),
                    4,
                    PLUM.filled(),
                )
            }))
            .map_err(render_err)?;

        Ok(())
    }

    fn draw_pie<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        rows: &[(String, f64)],
        summary: &ReportSummary,
        title: &str,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE).map_err(render_err)?;

        let (width, _) = root.dim_in_pixel();
        let title_style =
            TextStyle::from(("sans-serif", 28).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
        root.draw(&Text::new(
            title.to_string(),
            (width as i32 / 2, 16),
            title_style,
        ))
        .map_err(render_err)?;

        let (pie_area, report_area) = root.split_vertically(620);

        let slices = collapse_top_n(rows, TOP_SLICES);
        let sizes: Vec<f64> = slices.iter().map(|(_, value)| *value).collect();
        let labels: Vec<String> = slices.iter().map(|(name, _)| name.clone()).collect();
        let colors: Vec<RGBColor> = (0..slices.len())
            .map(|i| PALETTE[i % PALETTE.len()])
            .collect();

        let dims = pie_area.dim_in_pixel();
        let center = (dims.0 as i32 / 2, dims.1 as i32 / 2 + 20);
        let radius = 230.0;

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.start_angle(140.0);
        pie.label_style(("sans-serif", 16).into_font());
        pie.percentages(("sans-serif", 14).into_font().color(&BLACK));
        pie_area.draw(&pie).map_err(render_err)?;

        let report_style = TextStyle::from(("monospace", 18).into_font());
        for (i, line) in summary.report_lines().iter().enumerate() {
            report_area
                .draw(&Text::new(
                    line.clone(),
                    (40, 12 + i as i32 * 24),
                    report_style.clone(),
                ))
                .map_err(render_err)?;
        }

        Ok(())
    }
}

/// Keep the largest `limit` slices and collapse the rest into "Others".
fn collapse_top_n(rows: &[(String, f64)], limit: usize) -> Vec<(String, f64)> {
    if rows.len() <= limit {
        return rows.to_vec();
    }

    let total: f64 = rows.iter().map(|r| r.1).sum();
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(limit);

    let top_sum: f64 = sorted.iter().map(|r| r.1).sum();
    sorted.push(("Others".to_string(), total - top_sum));
    sorted
}

fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if max.is_finite() && max > 0.0 {
        max * 1.05
    } else {
        1.0
    }
}

fn format_axis(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(n: usize) -> Vec<(String, f64)> {
        (0..n).map(|i| (format!("C{i}"), (i + 1) as f64)).collect()
    }

    #[test]
    fn collapse_keeps_small_sets_intact() {
        let rows = series(5);
        assert_eq!(collapse_top_n(&rows, 8), rows);
    }

    #[test]
    fn collapse_adds_others_slice() {
        let rows = series(12);
        let total: f64 = rows.iter().map(|r| r.1).sum();

        let slices = collapse_top_n(&rows, 8);

        assert_eq!(slices.len(), 9);
        assert_eq!(slices.last().unwrap().0, "Others");
        let slice_total: f64 = slices.iter().map(|r| r.1).sum();
        assert!((slice_total - total).abs() < 1e-9);
        // Largest slice first after the sort.
        assert_eq!(slices[0].1, 12.0);
    }

    #[test]
    fn axis_labels_compact_large_values() {
        assert_eq!(format_axis(2.5e12), "2.5T");
        assert_eq!(format_axis(3.0e9), "3.0B");
        assert_eq!(format_axis(1.5e6), "1.5M");
        assert_eq!(format_axis(2_000.0), "2K");
        assert_eq!(format_axis(42.0), "42");
    }
}
