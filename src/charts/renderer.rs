//! Static Chart Renderer
//! Renders the two dashboard figures to PNG with plotters.
//!
//! Layout:
//! 1. Global figure, 2x2 grid:
//!    - written histogram | oral histogram
//!    - boxplot of both fields | barplot of both means
//! 2. Class figure, 2 stacked panels:
//!    - grouped barplot of per-class means
//!    - per-class boxplot split by score kind

use crate::charts::palette::score_rgb_color;
use crate::data::ScoreKind;
use crate::pipeline::{DashboardView, FieldChart};
use crate::stats::BoxStats;
use image::{ImageFormat, RgbImage};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const GLOBAL_FIGURE_FILE: &str = "analyse_globale.png";
pub const CLASS_FIGURE_FILE: &str = "analyse_par_classe.png";

const GLOBAL_SIZE: (u32, u32) = (1600, 1200);
const CLASS_SIZE: (u32, u32) = (1200, 1200);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("Cannot write figure: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Drawing(err.to_string())
    }
}

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type Chart2d<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Write both figures into `dir` and return their paths.
    pub fn export_figures(view: &DashboardView, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        let global_path = dir.join(GLOBAL_FIGURE_FILE);
        std::fs::write(
            &global_path,
            Self::render_global_figure(view, GLOBAL_SIZE.0, GLOBAL_SIZE.1)?,
        )?;

        let class_path = dir.join(CLASS_FIGURE_FILE);
        std::fs::write(
            &class_path,
            Self::render_class_figure(view, CLASS_SIZE.0, CLASS_SIZE.1)?,
        )?;

        log::info!("Exported figures to {}", dir.display());
        Ok(vec![global_path, class_path])
    }

    /// 2x2 grid of the whole-dataset charts, PNG encoded.
    pub fn render_global_figure(
        view: &DashboardView,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            let panels = root.split_evenly((2, 2));

            for (panel, chart) in panels.iter().zip(view.field_charts.iter()) {
                let title = match chart.kind {
                    ScoreKind::Written => "Répartition des notes d'écrit",
                    ScoreKind::Oral => "Répartition des notes d'oral",
                };
                Self::draw_histogram(panel, chart, title)?;
            }
            Self::draw_field_boxplot(&panels[2], &view.field_charts)?;
            Self::draw_field_means(&panels[3], &view.field_charts)?;

            root.present()?;
        }
        Self::encode_png(buf, width, height)
    }

    /// Stacked per-class charts for the current selection, PNG encoded.
    pub fn render_class_figure(
        view: &DashboardView,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buf = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buf, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            let panels = root.split_evenly((2, 1));

            Self::draw_class_means(&panels[0], view)?;
            Self::draw_class_boxplot(&panels[1], view)?;

            root.present()?;
        }
        Self::encode_png(buf, width, height)
    }

    fn encode_png(buf: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| RenderError::Drawing("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn draw_histogram(panel: &Panel, chart: &FieldChart, title: &str) -> Result<(), RenderError> {
        let (x_min, x_max) = match (chart.histogram.first(), chart.histogram.last()) {
            (Some(first), Some(last)) => (first.lower, last.upper),
            _ => (0.0, 20.0),
        };
        let max_count = chart.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        let y_max = (max_count as f64 * 1.1).max(1.0);

        let mut cc = ChartBuilder::on(panel)
            .caption(title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_desc("Note")
            .y_desc("Nombre d'élèves")
            .draw()?;

        let color = score_rgb_color(chart.kind);
        cc.draw_series(chart.histogram.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], color.filled())
        }))?;
        cc.draw_series(chart.histogram.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], BLACK.stroke_width(1))
        }))?;
        Ok(())
    }

    fn draw_field_boxplot(panel: &Panel, charts: &[FieldChart]) -> Result<(), RenderError> {
        let labels: Vec<&str> = charts.iter().map(|c| c.kind.column()).collect();
        let boxes: Vec<&BoxStats> = charts.iter().filter_map(|c| c.boxplot.as_ref()).collect();
        let (y_min, y_max) = Self::box_range(boxes.iter().copied());

        let mut cc = Self::categorical_chart(
            panel,
            "Boxplot des notes d'écrit et d'oral",
            labels.len(),
            y_min..y_max,
        )?;
        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| Self::category_label(&labels, *x))
            .draw()?;

        for (i, chart) in charts.iter().enumerate() {
            if let Some(stats) = &chart.boxplot {
                let color = score_rgb_color(chart.kind);
                let cx = i as f64;
                cc.draw_series(std::iter::once(Self::box_fill(cx, 0.3, stats, color)))?;
                Self::draw_box_outline(&mut cc, cx, 0.3, stats)?;
            }
        }
        Ok(())
    }

    fn draw_field_means(panel: &Panel, charts: &[FieldChart]) -> Result<(), RenderError> {
        let labels: Vec<&str> = charts.iter().map(|c| c.kind.column()).collect();
        let y_max = Self::bar_top(charts.iter().map(|c| c.mean));

        let mut cc = Self::categorical_chart(
            panel,
            "Comparaison des moyennes des notes",
            labels.len(),
            0.0..y_max,
        )?;
        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x| Self::category_label(&labels, *x))
            .y_desc("Moyenne")
            .draw()?;

        cc.draw_series(charts.iter().enumerate().map(|(i, c)| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, c.mean)],
                score_rgb_color(c.kind).filled(),
            )
        }))?;
        Ok(())
    }

    fn draw_class_means(panel: &Panel, view: &DashboardView) -> Result<(), RenderError> {
        let labels: Vec<&str> = view
            .class_summary
            .iter()
            .map(|c| c.class_label.as_str())
            .collect();
        let y_max = Self::bar_top(
            view.class_summary
                .iter()
                .flat_map(|c| [c.written.mean, c.oral.mean]),
        );

        let mut cc = Self::categorical_chart(
            panel,
            "Moyennes des notes par classe",
            labels.len().max(1),
            0.0..y_max,
        )?;
        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|x| Self::category_label(&labels, *x))
            .y_desc("Moyenne")
            .draw()?;

        for (offset, kind) in [(-0.2, ScoreKind::Written), (0.2, ScoreKind::Oral)] {
            let color = score_rgb_color(kind);
            cc.draw_series(view.class_summary.iter().enumerate().map(|(i, c)| {
                let x = i as f64 + offset;
                Rectangle::new(
                    [(x - 0.2, 0.0), (x + 0.2, c.field(kind).mean)],
                    color.filled(),
                )
            }))?
            .label(format!("Moyenne {}", kind.label()))
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_class_boxplot(panel: &Panel, view: &DashboardView) -> Result<(), RenderError> {
        let labels: Vec<&str> = view
            .class_summary
            .iter()
            .map(|c| c.class_label.as_str())
            .collect();
        let (y_min, y_max) = Self::box_range(view.class_boxes.iter().map(|b| &b.stats));

        let mut cc = Self::categorical_chart(
            panel,
            "Comparaison des notes d'écrit et d'oral par classe",
            labels.len().max(1),
            y_min..y_max,
        )?;
        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len().max(1))
            .x_label_formatter(&|x| Self::category_label(&labels, *x))
            .x_desc("Classe")
            .y_desc("Note")
            .draw()?;

        let position = |class_label: &str, kind: ScoreKind| {
            let idx = labels.iter().position(|l| *l == class_label).unwrap_or(0) as f64;
            match kind {
                ScoreKind::Written => idx - 0.2,
                ScoreKind::Oral => idx + 0.2,
            }
        };

        for kind in ScoreKind::ALL {
            let color = score_rgb_color(kind);
            cc.draw_series(
                view.class_boxes
                    .iter()
                    .filter(|b| b.kind == kind)
                    .map(|b| Self::box_fill(position(&b.class_label, kind), 0.18, &b.stats, color)),
            )?
            .label(kind.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }
        for b in &view.class_boxes {
            Self::draw_box_outline(&mut cc, position(&b.class_label, b.kind), 0.18, &b.stats)?;
        }

        cc.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    /// Chart with one x slot per category centered on 0, 1, 2, ...
    fn categorical_chart<'a, 'b>(
        panel: &'a Panel<'b>,
        title: &str,
        categories: usize,
        y_range: std::ops::Range<f64>,
    ) -> Result<Chart2d<'a, 'b>, RenderError> {
        let chart = ChartBuilder::on(panel)
            .caption(title, CAPTION_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5..(categories as f64 - 0.5), y_range)?;
        Ok(chart)
    }

    fn category_label(labels: &[&str], x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels
            .get(idx as usize)
            .map(|l| l.to_string())
            .unwrap_or_default()
    }

    fn box_fill(cx: f64, half: f64, stats: &BoxStats, color: RGBColor) -> Rectangle<(f64, f64)> {
        Rectangle::new([(cx - half, stats.q1), (cx + half, stats.q3)], color.filled())
    }

    fn draw_box_outline(
        cc: &mut Chart2d<'_, '_>,
        cx: f64,
        half: f64,
        stats: &BoxStats,
    ) -> Result<(), RenderError> {
        let line = BLACK.stroke_width(1);
        let cap = half / 2.0;

        cc.draw_series(std::iter::once(Rectangle::new(
            [(cx - half, stats.q1), (cx + half, stats.q3)],
            line,
        )))?;
        cc.draw_series(
            [
                vec![(cx - half, stats.median), (cx + half, stats.median)],
                vec![(cx, stats.whisker_low), (cx, stats.q1)],
                vec![(cx, stats.q3), (cx, stats.whisker_high)],
                vec![(cx - cap, stats.whisker_low), (cx + cap, stats.whisker_low)],
                vec![(cx - cap, stats.whisker_high), (cx + cap, stats.whisker_high)],
            ]
            .into_iter()
            .map(|points| PathElement::new(points, line)),
        )?;
        cc.draw_series(
            stats
                .outliers
                .iter()
                .map(|&v| Circle::new((cx, v), 3, line)),
        )?;
        Ok(())
    }

    /// Vertical extent of a set of boxes, padded.
    fn box_range<'a>(boxes: impl Iterator<Item = &'a BoxStats>) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for b in boxes {
            let low = b.outliers.first().map_or(b.whisker_low, |o| o.min(b.whisker_low));
            let high = b.outliers.last().map_or(b.whisker_high, |o| o.max(b.whisker_high));
            min = min.min(low);
            max = max.max(high);
        }
        if min.is_infinite() {
            return (0.0, 20.0);
        }
        let pad = ((max - min) * 0.1).max(0.5);
        (min - pad, max + pad)
    }

    fn bar_top(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.filter(|v| v.is_finite()).fold(0.0, f64::max);
        (max * 1.15).max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let labels = ["1G1", "1G2"];
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.0), "1G1");
        assert_eq!(StaticChartRenderer::category_label(&labels, 1.0), "1G2");
        assert_eq!(StaticChartRenderer::category_label(&labels, 0.5), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, -1.0), "");
        assert_eq!(StaticChartRenderer::category_label(&labels, 2.0), "");
    }

    #[test]
    fn box_range_includes_outliers() {
        let b = BoxStats {
            whisker_low: 8.0,
            q1: 10.0,
            median: 12.0,
            q3: 13.0,
            whisker_high: 16.0,
            outliers: vec![2.0, 19.5],
        };
        let (low, high) = StaticChartRenderer::box_range(std::iter::once(&b));
        assert!(low < 2.0);
        assert!(high > 19.5);
        assert_eq!(
            StaticChartRenderer::box_range(std::iter::empty::<&BoxStats>()),
            (0.0, 20.0)
        );
    }

    #[test]
    fn bar_top_ignores_nan() {
        assert_eq!(StaticChartRenderer::bar_top([f64::NAN].into_iter()), 1.0);
        assert!(StaticChartRenderer::bar_top([10.0, 12.0].into_iter()) > 12.0);
    }
}
