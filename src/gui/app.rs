//! Bac Dashboard Main Application
//! Main window with control panel and dashboard page.

use crate::charts::StaticChartRenderer;
use crate::config::Settings;
use crate::data::{ScoreTable, Selection};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, DashboardView};
use egui::SidePanel;

/// Main application window.
pub struct BacDashboardApp {
    settings: Settings,
    table: ScoreTable,
    selection: Selection,
    view: DashboardView,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl BacDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings, table: ScoreTable) -> Self {
        // every class is selected on first display
        let selection = Selection::all(&table);
        let view = pipeline::render(&table, &selection, &settings);
        let control_panel = ControlPanel::new(&settings.csv_path, &table);

        Self {
            settings,
            table,
            selection,
            view,
            control_panel,
            chart_viewer: ChartViewer::new(),
        }
    }

    /// Recompute the view after a selection change.
    fn refresh(&mut self) {
        self.view = pipeline::render(&self.table, &self.selection, &self.settings);
    }

    /// Export both figures as PNG into a user-picked folder.
    fn handle_export(&mut self) {
        let Some(dir) = rfd::FileDialog::new()
            .set_title("Dossier d'export des figures")
            .pick_folder()
        else {
            return;
        };

        match StaticChartRenderer::export_figures(&self.view, &dir) {
            Ok(paths) => {
                self.control_panel
                    .set_status(&format!("{} figures exportées", paths.len()));
                if let Err(e) = open::that(&dir) {
                    log::warn!("Cannot open {}: {e}", dir.display());
                }
            }
            Err(e) => {
                log::error!("Figure export failed: {e}");
                self.control_panel.set_error(&e.to_string());
            }
        }
    }
}

impl eframe::App for BacDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::ExportFigures => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard page
        let changed = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.chart_viewer
                    .show(ui, &self.table, &self.view, &mut self.selection)
            })
            .inner;

        if changed {
            self.refresh();
        }
    }
}
