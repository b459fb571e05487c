//! Chart Viewer Widget
//! Scrollable dashboard page: global analysis first, then the per-class
//! section driven by the class multi-select.

use crate::charts::ChartPlotter;
use crate::data::{ScoreTable, Selection};
use crate::gui::control_panel::class_selector;
use crate::pipeline::DashboardView;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;
const CHART_SPACING: f32 = 12.0;

pub const PAGE_TITLE: &str = "Analyse des Résultats Bac Français 2024 - LFIAM";

/// Fixed commentary shown under the global charts.
const NARRATIVE_TITLE: &str = "Analyse des performances en écrit et en oral :";
const NARRATIVE: [(&str, &str); 3] = [
    (
        "Hétérogénéité à l'oral",
        "Les élèves ont de meilleures moyennes à l'oral, mais la différence entre les notes \
         minimales et maximales est plus marquée (3 à 20) qu'à l'écrit (7 à 20), indiquant une \
         plus grande variabilité.",
    ),
    (
        "Concentration à l'écrit",
        "Les notes d'écrit sont plus homogènes, concentrées autour de 8 à 14, avec moins de \
         dispersion.",
    ),
    (
        "Performance générale",
        "Les élèves réussissent mieux à l'oral, mais l'écart des performances montre que \
         certains excellent tandis que d'autres rencontrent des difficultés.",
    ),
];

/// Dashboard page renderer.
#[derive(Default)]
pub struct ChartViewer;

impl ChartViewer {
    pub fn new() -> Self {
        Self
    }

    /// Draw the whole page. Returns true when the class selection changed.
    pub fn show(
        &self,
        ui: &mut egui::Ui,
        table: &ScoreTable,
        view: &DashboardView,
        selection: &mut Selection,
    ) -> bool {
        let mut changed = false;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(PAGE_TITLE).size(24.0).strong());
                ui.add_space(SECTION_SPACING);

                Self::draw_global_section(ui, table, view);

                ui.add_space(SECTION_SPACING);
                ui.separator();
                ui.add_space(SECTION_SPACING);

                changed = Self::draw_class_section(ui, view, selection);
            });

        changed
    }

    fn section_title(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(20.0).strong());
        ui.add_space(8.0);
    }

    fn subtitle(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(15.0).strong());
        ui.add_space(4.0);
    }

    fn chart_title(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(13.0).strong());
    }

    fn draw_global_section(ui: &mut egui::Ui, table: &ScoreTable, view: &DashboardView) {
        Self::section_title(ui, "1. Analyse globale de tous les résultats");

        ui.columns(2, |cols| {
            Self::subtitle(&mut cols[0], "Résultats par élèves :");
            ChartPlotter::draw_records_table(&mut cols[0], table);

            Self::subtitle(&mut cols[1], "Résumé statistique :");
            ChartPlotter::draw_global_table(&mut cols[1], &view.global);
        });

        ui.add_space(SECTION_SPACING);
        Self::subtitle(ui, "Distributions et comparaisons des notes d'écrit et d'oral : ");

        // 2x2 grid: written histogram, oral histogram, boxplot, means
        ui.columns(2, |cols| {
            for (col, chart) in cols.iter_mut().zip(&view.field_charts) {
                let title = format!("Répartition des notes d'{}", chart.kind.label().to_lowercase());
                Self::chart_title(col, &title);
                ChartPlotter::draw_histogram(col, chart);
            }
        });
        ui.add_space(CHART_SPACING);
        ui.columns(2, |cols| {
            Self::chart_title(&mut cols[0], "Boxplot des notes d'écrit et d'oral");
            ChartPlotter::draw_field_boxplot(&mut cols[0], &view.field_charts);

            Self::chart_title(&mut cols[1], "Comparaison des moyennes des notes");
            ChartPlotter::draw_field_means(&mut cols[1], &view.field_charts);
        });

        ui.add_space(SECTION_SPACING);
        Self::draw_narrative(ui);
    }

    fn draw_narrative(ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(NARRATIVE_TITLE).size(16.0).strong());
                ui.add_space(6.0);
                for (head, body) in NARRATIVE {
                    ui.horizontal_wrapped(|ui| {
                        ui.label("•");
                        ui.label(RichText::new(format!("{head} :")).strong());
                        ui.label(body);
                    });
                }
            });
    }

    fn draw_class_section(
        ui: &mut egui::Ui,
        view: &DashboardView,
        selection: &mut Selection,
    ) -> bool {
        Self::section_title(ui, "2. Analyse par classe");

        let changed = class_selector(ui, &view.class_options, selection);
        ui.add_space(CHART_SPACING);

        if view.class_summary.is_empty() {
            ui.label(
                RichText::new("Aucune classe sélectionnée.")
                    .italics()
                    .color(Color32::GRAY),
            );
            return changed;
        }

        Self::subtitle(ui, "Indicateurs par classe :");
        ChartPlotter::draw_class_table(ui, &view.class_summary);
        ui.label(
            RichText::new(format!("{} élèves sélectionnés", view.selected_records))
                .size(11.0)
                .color(Color32::GRAY),
        );

        ui.add_space(SECTION_SPACING);
        Self::chart_title(ui, "Moyennes des notes par classe");
        ChartPlotter::draw_class_means(ui, &view.class_summary);

        ui.add_space(CHART_SPACING);
        let classes: Vec<String> = view
            .class_summary
            .iter()
            .map(|c| c.class_label.clone())
            .collect();
        Self::chart_title(ui, "Comparaison des notes d'écrit et d'oral par classe");
        ChartPlotter::draw_class_boxplot(ui, &classes, &view.class_boxes);

        changed
    }
}
