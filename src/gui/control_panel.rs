//! Control Panel Widget
//! Left side panel with data source details, export and status, plus the
//! class multi-select used by the per-class section.

use crate::data::{ScoreTable, Selection};
use egui::{Color32, RichText};
use std::path::{Path, PathBuf};

/// Left side control panel.
pub struct ControlPanel {
    pub csv_path: PathBuf,
    pub record_count: usize,
    pub dropped_count: usize,
    pub class_count: usize,
    pub status: String,
    pub is_error: bool,
}

impl ControlPanel {
    pub fn new(csv_path: &Path, table: &ScoreTable) -> Self {
        let mut panel = Self {
            csv_path: csv_path.to_path_buf(),
            record_count: table.len(),
            dropped_count: table.dropped(),
            class_count: table.class_labels().len(),
            status: String::new(),
            is_error: false,
        };
        panel.set_status(&Self::loaded_status(table));
        panel
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Bac Français 2024")
                    .size(20.0)
                    .color(Color32::from_rgb(0x2a, 0x9d, 0x8f)),
            );
            ui.label(RichText::new("LFIAM").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Données").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let file_name = self
                    .csv_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| self.csv_path.display().to_string());
                ui.label(RichText::new(file_name).size(12.0))
                    .on_hover_text(self.csv_path.display().to_string());

                ui.add_space(4.0);
                egui::Grid::new("source_counts")
                    .num_columns(2)
                    .spacing([12.0, 2.0])
                    .show(ui, |ui| {
                        ui.label("Élèves retenus :");
                        ui.label(self.record_count.to_string());
                        ui.end_row();
                        ui.label("Lignes écartées :");
                        let dropped = RichText::new(self.dropped_count.to_string());
                        ui.label(if self.dropped_count > 0 {
                            dropped.color(Color32::from_rgb(220, 140, 40))
                        } else {
                            dropped
                        })
                        .on_hover_text("Note d'écrit ou d'oral absente ou non numérique");
                        ui.end_row();
                        ui.label("Classes :");
                        ui.label(self.class_count.to_string());
                        ui.end_row();
                    });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Exporter les figures").size(14.0))
                .min_size(egui::vec2(200.0, 32.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::ExportFigures;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    fn loaded_status(table: &ScoreTable) -> String {
        format!("{} élèves chargés", table.len())
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Erreur : {error}");
        self.is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ExportFigures,
}

/// Multi-select over class labels. Returns true when the selection changed.
pub fn class_selector(ui: &mut egui::Ui, options: &[String], selection: &mut Selection) -> bool {
    let mut changed = false;

    ui.label("Sélectionnez les classes à afficher");
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for class_label in options {
                    let mut selected = selection.contains(class_label);
                    let text = if class_label.is_empty() {
                        "(sans classe)"
                    } else {
                        class_label.as_str()
                    };
                    if ui.checkbox(&mut selected, text).changed() {
                        selection.set(class_label, selected);
                        changed = true;
                    }
                }
            });
        });

    ui.horizontal(|ui| {
        if ui.small_button("Tout sélectionner").clicked() {
            *selection = Selection::from_labels(options.iter().cloned());
            changed = true;
        }
        if ui.small_button("Tout désélectionner").clicked() {
            selection.clear();
            changed = true;
        }
        let count = if selection.is_empty() {
            "aucune classe".to_string()
        } else {
            format!("{} / {} classes", selection.len(), options.len())
        };
        ui.label(RichText::new(count).size(11.0).color(Color32::GRAY));
    });

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ExamRecord;

    #[test]
    fn startup_status_is_french() {
        let record = ExamRecord {
            source_row: 0,
            class_label: "1G1".to_string(),
            last_name: "Martin".to_string(),
            first_name: "Léa".to_string(),
            written: 10.0,
            oral: 12.0,
        };
        let table = ScoreTable::new(vec![record], 1);
        let panel = ControlPanel::new(Path::new("notes_bac_2024.csv"), &table);

        assert_eq!(panel.status, "1 élèves chargés");
        assert!(!panel.is_error);
        assert_eq!(panel.dropped_count, 1);
        assert_eq!(panel.class_count, 1);
    }
}
