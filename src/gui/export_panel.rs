use eframe::egui;
use egui_phosphor::regular as icons;
use secrecy::{ExposeSecret as _, SecretString};

use crate::api::types::{ConflictPolicy, DbEngine};
use crate::gui::SculleryApp;
use crate::view::ExportSummaryView;
use crate::workflow::{Intent, Stage};

impl SculleryApp {
    pub(crate) fn render_export_panel(&mut self, ctx: &egui::Context) -> Option<Intent> {
        let mut intent = None;
        let mut open = true;

        egui::Window::new(format!("{} Save to Database", icons::DATABASE))
            .open(&mut open)
            .resizable(true)
            .default_width(420.0)
            .show(ctx, |ui| {
                intent = if let Some(summary) = self.export_summary.clone() {
                    self.render_export_summary(ui, &summary)
                } else {
                    self.render_export_form(ui)
                };
            });

        if !open {
            intent = Some(Intent::CloseExportPanel);
        }
        intent
    }

    fn render_export_form(&mut self, ui: &mut egui::Ui) -> Option<Intent> {
        let mut intent = None;

        if let Some(filepath) = &self.export_filepath {
            ui.label(egui::RichText::new(format!("Source: {filepath}")).weak());
            ui.add_space(crate::theme::SPACING_SMALL);
        }

        egui::Grid::new("export_grid")
            .num_columns(2)
            .spacing([40.0, crate::theme::SPACING_MEDIUM])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Destination:");
                let old_engine = self.export_form.engine;
                egui::ComboBox::from_id_salt("export_engine")
                    .selected_text(self.export_form.engine.label())
                    .show_ui(ui, |ui| {
                        for engine in [
                            DbEngine::Sqlite,
                            DbEngine::PostgreSql,
                            DbEngine::MySql,
                            DbEngine::MongoDb,
                        ] {
                            ui.selectable_value(
                                &mut self.export_form.engine,
                                engine,
                                engine.label(),
                            );
                        }
                    });
                if self.export_form.engine != old_engine {
                    self.export_form.apply_engine_defaults();
                }
                ui.end_row();

                if self.export_form.engine.is_file_based() {
                    ui.label("Database File:");
                    ui.text_edit_singleline(&mut self.export_form.sqlite_path);
                    ui.end_row();
                } else {
                    ui.label("Host:");
                    ui.text_edit_singleline(&mut self.export_form.host);
                    ui.end_row();

                    ui.label("Port:");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.export_form.port)
                            .desired_width(100.0),
                    );
                    ui.end_row();

                    ui.label("Username:");
                    ui.text_edit_singleline(&mut self.export_form.username);
                    ui.end_row();

                    ui.label("Password:");
                    let mut pass = self.export_form.password.expose_secret().to_owned();
                    let response = ui.add(egui::TextEdit::singleline(&mut pass).password(true));
                    if response.changed() {
                        self.export_form.password = SecretString::from(pass);
                    }
                    ui.end_row();

                    ui.label("Database Name:");
                    ui.text_edit_singleline(&mut self.export_form.database);
                    ui.end_row();
                }

                if self.export_form.engine == DbEngine::MongoDb {
                    ui.label("Collection Name:");
                } else {
                    ui.label("Table Name:");
                }
                ui.text_edit_singleline(&mut self.export_form.table_name);
                ui.end_row();

                ui.label("If it exists:");
                egui::ComboBox::from_id_salt("export_if_exists")
                    .selected_text(self.export_form.if_exists.label())
                    .show_ui(ui, |ui| {
                        for policy in [
                            ConflictPolicy::Fail,
                            ConflictPolicy::Replace,
                            ConflictPolicy::Append,
                        ] {
                            ui.selectable_value(
                                &mut self.export_form.if_exists,
                                policy,
                                policy.label(),
                            );
                        }
                    });
                ui.end_row();
            });

        ui.add_space(crate::theme::SPACING_MEDIUM);
        ui.horizontal(|ui| {
            if self.controller.busy() == Some(Stage::Export) {
                ui.add(egui::Spinner::new());
                let elapsed = self.controller.elapsed_secs().unwrap_or(0.0);
                ui.label(format!("Exporting... ({elapsed:.1}s)"));
            } else if ui
                .add_enabled(
                    self.controller.busy().is_none(),
                    egui::Button::new(format!("{} Export", icons::FLOPPY_DISK)),
                )
                .clicked()
            {
                intent = Some(Intent::SubmitExport {
                    destination: self.export_form.destination(),
                    table_name: self.export_form.table_name.clone(),
                    if_exists: self.export_form.if_exists,
                });
            }
        });

        intent
    }

    fn render_export_summary(
        &mut self,
        ui: &mut egui::Ui,
        summary: &ExportSummaryView,
    ) -> Option<Intent> {
        let mut intent = None;

        ui.label(
            egui::RichText::new(format!("{} Export complete", icons::CHECK_CIRCLE))
                .color(crate::theme::ACCENT_COLOR)
                .strong(),
        );
        ui.add_space(crate::theme::SPACING_SMALL);

        egui::Grid::new("export_summary_grid")
            .num_columns(2)
            .spacing([40.0, crate::theme::SPACING_SMALL])
            .show(ui, |ui| {
                ui.label("Destination:");
                ui.label(summary.engine_label);
                ui.end_row();

                ui.label("Table:");
                ui.label(egui::RichText::new(&summary.table_name).strong());
                ui.end_row();

                ui.label("Rows exported:");
                ui.label(summary.rows_exported.to_string());
                ui.end_row();

                if let Some(db_file) = &summary.db_file {
                    ui.label("Database file:");
                    ui.label(db_file);
                    ui.end_row();
                }
            });

        ui.add_space(crate::theme::SPACING_MEDIUM);
        ui.horizontal(|ui| {
            if ui.button("Export Again").clicked() {
                self.export_summary = None;
            }
            if ui.button("Close").clicked() {
                intent = Some(Intent::CloseExportPanel);
            }
        });

        intent
    }
}
