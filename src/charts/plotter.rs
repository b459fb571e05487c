//! Chart Plotter Module
//! Interactive charts and tables drawn with egui_plot from precomputed values.

use crate::charts::palette::score_color;
use crate::data::{ScoreKind, ScoreTable};
use crate::pipeline::FieldChart;
use crate::stats::{BoxStats, ClassBox, ClassIndicators, GlobalSummary, SummaryStats};
use egui::{Color32, RichText, ScrollArea, Stroke};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, Points};

/// Height of each chart in the 2x2 global grid
pub const GRID_CHART_HEIGHT: f32 = 260.0;
/// Height of each stacked per-class chart
pub const STACKED_CHART_HEIGHT: f32 = 340.0;

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Axis formatter showing category names on integer ticks only.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    fn box_elem(x: f64, width: f64, stats: &BoxStats, color: Color32) -> BoxElem {
        BoxElem::new(
            x,
            BoxSpread::new(
                stats.whisker_low,
                stats.q1,
                stats.median,
                stats.q3,
                stats.whisker_high,
            ),
        )
        .box_width(width)
        .whisker_width(width / 2.0)
        .fill(color.gamma_multiply(0.85))
        .stroke(Stroke::new(1.2, Color32::BLACK))
    }

    fn outlier_points(x: f64, stats: &BoxStats) -> Points {
        let points: Vec<[f64; 2]> = stats.outliers.iter().map(|&v| [x, v]).collect();
        Points::new(points)
            .radius(3.0)
            .color(Color32::DARK_GRAY)
            .filled(false)
    }

    /// Histogram of one score field.
    pub fn draw_histogram(ui: &mut egui::Ui, chart: &FieldChart) {
        let color = score_color(chart.kind);
        let bars: Vec<Bar> = chart
            .histogram
            .iter()
            .map(|b| {
                Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                    .width(b.upper - b.lower)
                    .fill(color)
                    .stroke(Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new(format!("histogram_{}", chart.kind.column()))
            .height(GRID_CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Note")
            .y_axis_label("Nombre d'élèves")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(color).name(chart.kind.label()));
            });
    }

    /// Side-by-side boxplots of both score fields.
    pub fn draw_field_boxplot(ui: &mut egui::Ui, charts: &[FieldChart]) {
        let labels: Vec<String> = charts.iter().map(|c| c.kind.column().to_string()).collect();

        Plot::new("field_boxplot")
            .height(GRID_CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, chart) in charts.iter().enumerate() {
                    let Some(stats) = &chart.boxplot else {
                        continue;
                    };
                    let color = score_color(chart.kind);
                    plot_ui.box_plot(
                        BoxPlot::new(vec![Self::box_elem(i as f64, 0.6, stats, color)])
                            .name(chart.kind.column()),
                    );
                    if !stats.outliers.is_empty() {
                        plot_ui.points(Self::outlier_points(i as f64, stats));
                    }
                }
            });
    }

    /// Bar per score field showing its mean.
    pub fn draw_field_means(ui: &mut egui::Ui, charts: &[FieldChart]) {
        let labels: Vec<String> = charts.iter().map(|c| c.kind.column().to_string()).collect();

        Plot::new("field_means")
            .height(GRID_CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Moyenne")
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (i, chart) in charts.iter().enumerate() {
                    let color = score_color(chart.kind);
                    let bar = Bar::new(i as f64, chart.mean)
                        .width(0.8)
                        .fill(color)
                        .name(format!("{} {:.2}", chart.kind.column(), chart.mean));
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color));
                }
            });
    }

    /// Grouped bars of per-class means, one pair per class.
    pub fn draw_class_means(ui: &mut egui::Ui, summary: &[ClassIndicators]) {
        let labels: Vec<String> = summary.iter().map(|c| c.class_label.clone()).collect();

        Plot::new("class_means")
            .height(STACKED_CHART_HEIGHT)
            .allow_scroll(false)
            .include_y(0.0)
            .y_axis_label("Moyenne")
            .legend(Legend::default())
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for (offset, kind) in [(-0.2, ScoreKind::Written), (0.2, ScoreKind::Oral)] {
                    let color = score_color(kind);
                    let bars: Vec<Bar> = summary
                        .iter()
                        .enumerate()
                        .map(|(i, c)| {
                            Bar::new(i as f64 + offset, c.field(kind).mean)
                                .width(0.4)
                                .fill(color)
                                .name(&c.class_label)
                        })
                        .collect();
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(color)
                            .name(format!("Moyenne {}", kind.label())),
                    );
                }
            });
    }

    /// Boxplot per class, split by score kind.
    pub fn draw_class_boxplot(ui: &mut egui::Ui, classes: &[String], boxes: &[ClassBox]) {
        let labels = classes.to_vec();

        Plot::new("class_boxplot")
            .height(STACKED_CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Classe")
            .y_axis_label("Note")
            .legend(Legend::default())
            .x_axis_formatter(Self::category_formatter(labels))
            .show(ui, |plot_ui| {
                for kind in ScoreKind::ALL {
                    let color = score_color(kind);
                    let offset = match kind {
                        ScoreKind::Written => -0.2,
                        ScoreKind::Oral => 0.2,
                    };

                    let mut elems = Vec::new();
                    for b in boxes.iter().filter(|b| b.kind == kind) {
                        let Some(idx) = classes.iter().position(|c| *c == b.class_label) else {
                            continue;
                        };
                        let x = idx as f64 + offset;
                        elems.push(Self::box_elem(x, 0.36, &b.stats, color));
                        if !b.stats.outliers.is_empty() {
                            plot_ui.points(Self::outlier_points(x, &b.stats));
                        }
                    }
                    plot_ui.box_plot(BoxPlot::new(elems).color(color).name(kind.label()));
                }
            });
    }

    fn header(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).strong().size(12.0));
    }

    fn cell(ui: &mut egui::Ui, text: impl Into<String>) {
        ui.label(RichText::new(text.into()).size(12.0));
    }

    fn format_opt(value: Option<f64>, decimals: usize) -> String {
        match value {
            Some(v) => format!("{v:.decimals$}"),
            None => "-".to_string(),
        }
    }

    /// Table of every cleaned record.
    pub fn draw_records_table(ui: &mut egui::Ui, table: &ScoreTable) {
        ScrollArea::vertical()
            .id_salt("records_table")
            .max_height(320.0)
            .show(ui, |ui| {
                egui::Grid::new("records_grid")
                    .striped(true)
                    .min_col_width(40.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for title in ["", "Classe", "Nom", "Prenom", "note_ecrit", "note_oral"] {
                            Self::header(ui, title);
                        }
                        ui.end_row();

                        for r in table.records() {
                            Self::cell(ui, r.source_row.to_string());
                            Self::cell(ui, &r.class_label);
                            Self::cell(ui, &r.last_name);
                            Self::cell(ui, &r.first_name);
                            Self::cell(ui, format!("{:.2}", r.written));
                            Self::cell(ui, format!("{:.2}", r.oral));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Describe-style table: one row per statistic, one column per field.
    pub fn draw_global_table(ui: &mut egui::Ui, global: &GlobalSummary) {
        type Row = (&'static str, fn(&SummaryStats) -> String);
        let rows: [Row; 8] = [
            ("count", |s| format!("{:.1}", s.count as f64)),
            ("mean", |s| format!("{:.4}", s.mean)),
            ("std", |s| Self::format_opt(s.std, 4)),
            ("min", |s| format!("{:.4}", s.min)),
            ("25%", |s| format!("{:.4}", s.q25)),
            ("50%", |s| format!("{:.4}", s.median)),
            ("75%", |s| format!("{:.4}", s.q75)),
            ("max", |s| format!("{:.4}", s.max)),
        ];

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("global_summary_grid")
                    .striped(true)
                    .min_col_width(60.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        Self::header(ui, "");
                        for kind in ScoreKind::ALL {
                            Self::header(ui, kind.column());
                        }
                        ui.end_row();

                        for (name, render_cell) in rows {
                            Self::header(ui, name);
                            for kind in ScoreKind::ALL {
                                Self::cell(ui, render_cell(global.field(kind)));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Per-class indicators table.
    pub fn draw_class_table(ui: &mut egui::Ui, summary: &[ClassIndicators]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::horizontal().id_salt("class_table").show(ui, |ui| {
                    egui::Grid::new("class_summary_grid")
                        .striped(true)
                        .min_col_width(55.0)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            Self::header(ui, "Classe");
                            for kind in ScoreKind::ALL {
                                for stat in ["Moyenne", "Écart-type", "Min", "Max"] {
                                    Self::header(ui, &format!("{stat} {}", kind.label()));
                                }
                            }
                            ui.end_row();

                            let label_color = ui.visuals().strong_text_color();
                            for c in summary {
                                ui.label(
                                    RichText::new(&c.class_label)
                                        .size(12.0)
                                        .color(label_color),
                                )
                                .on_hover_text(format!("{} élèves", c.count));
                                for kind in ScoreKind::ALL {
                                    let f = c.field(kind);
                                    Self::cell(ui, format!("{:.2}", f.mean));
                                    Self::cell(ui, Self::format_opt(f.std, 2));
                                    Self::cell(ui, format!("{:.2}", f.min));
                                    Self::cell(ui, format!("{:.2}", f.max));
                                }
                                ui.end_row();
                            }
                        });
                });
            });
    }
}
