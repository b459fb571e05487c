//! Load → clean → aggregate pipeline and the view model it produces.
//!
//! ```text
//!  notes_bac_2024.csv
//!        │  DataLoader::load_csv
//!        ▼
//!   DataFrame ──DataProcessor::clean──▶ ScoreTable (immutable)
//!                                           │
//!                      Selection ──────────▶ render() ──▶ DashboardView
//! ```

use crate::config::Settings;
use crate::data::{filtered_records, DataLoader, DataProcessor, ScoreKind, ScoreTable, Selection};
use crate::error::Result;
use crate::stats::{
    class_boxes, global_summary, group_summary, long_form, BoxStats, ClassBox, ClassIndicators,
    GlobalSummary, HistogramBin, LongScore, StatsCalculator,
};

/// Chart-ready numbers of one score field over the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChart {
    pub kind: ScoreKind,
    pub histogram: Vec<HistogramBin>,
    pub boxplot: Option<BoxStats>,
    pub mean: f64,
}

/// Everything the presenter draws for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Class labels offered by the multi-select, first appearance order
    pub class_options: Vec<String>,
    pub global: GlobalSummary,
    pub field_charts: Vec<FieldChart>,
    pub selected_records: usize,
    pub class_summary: Vec<ClassIndicators>,
    pub long_form: Vec<LongScore>,
    pub class_boxes: Vec<ClassBox>,
}

/// Read and clean the configured export.
pub fn load_clean(settings: &Settings) -> Result<ScoreTable> {
    let df = DataLoader::load_csv(&settings.csv_path, settings.separator_byte())?;
    DataProcessor::clean(&df, settings.decimal_comma)
}

/// Recompute every aggregate for the given selection.
pub fn render(table: &ScoreTable, selection: &Selection, settings: &Settings) -> DashboardView {
    let global = global_summary(table);

    let field_charts = ScoreKind::ALL
        .iter()
        .map(|&kind| {
            let values = table.scores(kind);
            FieldChart {
                kind,
                histogram: StatsCalculator::histogram(&values, settings.histogram_bins),
                boxplot: StatsCalculator::compute_box_stats(&values),
                mean: global.field(kind).mean,
            }
        })
        .collect();

    let class_summary = group_summary(table, selection, settings.group_order);
    let long_form = long_form(table, selection);
    let class_order: Vec<String> = class_summary
        .iter()
        .map(|c| c.class_label.clone())
        .collect();
    let class_boxes = class_boxes(&long_form, &class_order);

    log::debug!(
        "Rendered view: {} of {} classes selected",
        class_summary.len(),
        table.class_labels().len()
    );

    DashboardView {
        class_options: table.class_labels(),
        global,
        field_charts,
        selected_records: filtered_records(table, selection).len(),
        class_summary,
        long_form,
        class_boxes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Division de classe;Nom candidat;Prénom candidat;\
T001 - 1 - Français écrit - Ponctuel;T002 - 1 - Français oral - Ponctuel";

    fn write_fixture(dir: &std::path::Path, rows: &[&str]) -> Settings {
        let path = dir.join("notes_bac_2024.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        Settings {
            csv_path: path,
            ..Settings::default()
        }
    }

    #[test]
    fn three_row_fixture_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let settings = write_fixture(
            dir.path(),
            &[
                "A;Martin;Léa;10;12",
                "A;Durand;Hugo;NA;14",
                "B;Petit;Inès;15;16",
            ],
        );

        let table = load_clean(&settings).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dropped(), 1);
        assert_eq!(table.records()[0].last_name, "Martin");
        assert_eq!(table.records()[1].last_name, "Petit");
        assert_eq!(table.records()[1].source_row, 2);

        let view = render(&table, &Selection::all(&table), &settings);
        assert_eq!(view.global.written.count, 2);
        assert_eq!(view.class_options, vec!["A", "B"]);
        assert_eq!(view.class_summary.len(), 2);
        assert_eq!(view.class_summary[0].count, 1);
        assert_eq!(view.class_summary[0].written.mean, 10.0);
        assert_eq!(view.class_summary[0].oral.mean, 12.0);
        assert_eq!(view.class_summary[1].written.mean, 15.0);
        assert_eq!(view.class_summary[1].oral.mean, 16.0);
        assert_eq!(view.long_form.len(), 4);
        assert_eq!(view.class_boxes.len(), 4);

        let only_b = render(&table, &Selection::from_labels(["B"]), &settings);
        assert_eq!(only_b.class_summary.len(), 1);
        assert_eq!(only_b.class_summary[0].class_label, "B");
        assert_eq!(only_b.long_form.len(), 2);
        assert_eq!(only_b.selected_records, 1);
        // global section ignores the selection
        assert_eq!(only_b.global, view.global);
        assert_eq!(only_b.class_options, view.class_options);
    }

    #[test]
    fn field_charts_use_configured_bins() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = write_fixture(
            dir.path(),
            &["A;X;Y;8;3", "A;X;Y;12;20", "B;X;Y;20;11", "B;X;Y;7;9"],
        );
        settings.histogram_bins = 4;

        let table = load_clean(&settings).unwrap();
        let view = render(&table, &Selection::all(&table), &settings);

        assert_eq!(view.field_charts.len(), 2);
        for chart in &view.field_charts {
            assert_eq!(chart.histogram.len(), 4);
            assert_eq!(
                chart.histogram.iter().map(|b| b.count).sum::<usize>(),
                table.len()
            );
            assert_eq!(chart.mean, view.global.field(chart.kind).mean);
        }
        assert_eq!(view.field_charts[0].kind, ScoreKind::Written);
        assert_eq!(view.field_charts[0].mean, 11.75);
    }

    #[test]
    fn empty_selection_renders_empty_class_section() {
        let dir = tempfile::tempdir().unwrap();
        let settings = write_fixture(dir.path(), &["A;X;Y;8;3"]);
        let table = load_clean(&settings).unwrap();

        let view = render(&table, &Selection::default(), &settings);
        assert!(view.class_summary.is_empty());
        assert!(view.long_form.is_empty());
        assert!(view.class_boxes.is_empty());
        assert_eq!(view.global.oral.count, 1);
    }
}
