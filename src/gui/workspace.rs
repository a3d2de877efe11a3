use eframe::egui;
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular as icons;
use rfd::FileDialog;

use crate::api::types::{AnalysisReport, ColumnProfile, ColumnStats, MissingStrategy, OutlierStrategy};
use crate::gui::SculleryApp;
use crate::utils::{fmt_cell, fmt_opt};
use crate::view::ResultView;
use crate::workflow::{Intent, Stage};

impl SculleryApp {
    pub(crate) fn render_workspace(&mut self, ctx: &egui::Context) -> Option<Intent> {
        let mut intent = None;

        egui::TopBottomPanel::top("workspace_top")
            .frame(crate::theme::top_bar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        egui::RichText::new(format!("{} Scullery", icons::CHART_BAR))
                            .size(24.0)
                            .strong(),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(format!("{} Sign Out", icons::SIGN_OUT)).clicked() {
                            intent = Some(Intent::Logout);
                        }
                        ui.label(egui::RichText::new("CSV in, clean tables out.").weak());
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(crate::theme::central_panel_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    if let Some(picked) = self.render_upload_card(ui) {
                        intent = Some(picked);
                    }

                    if let Some(analysis) = self.analysis.clone() {
                        ui.add_space(crate::theme::SPACING_LARGE);
                        if let Some(run) = self.render_analysis_card(ui, &analysis) {
                            intent = Some(run);
                        }
                    }

                    if let Some(result) = self.result.clone() {
                        ui.add_space(crate::theme::SPACING_LARGE);
                        if let Some(open) = self.render_result_card(ui, &result) {
                            intent = Some(open);
                        }
                    }

                    ui.add_space(crate::theme::SPACING_MEDIUM);
                    crate::utils::render_status_message(ui, &self.status);
                    ui.add_space(crate::theme::SPACING_LARGE);
                });
            });

        intent
    }

    fn render_upload_card(&mut self, ui: &mut egui::Ui) -> Option<Intent> {
        let mut intent = None;

        crate::theme::card_frame(ui).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(icons::FILE)
                        .size(18.0)
                        .color(crate::theme::ACCENT_COLOR),
                );
                ui.strong("Source File");
            });
            ui.add_space(crate::theme::SPACING_SMALL);

            match self.workflow.uploaded() {
                Some(uploaded) => {
                    ui.label(format!("On server: {}", uploaded.filepath));
                }
                None => {
                    ui.label(egui::RichText::new("Pick a CSV file to upload and analyse.").weak());
                }
            }
            ui.add_space(crate::theme::SPACING_SMALL);

            if self.controller.busy() == Some(Stage::Upload) {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    let elapsed = self.controller.elapsed_secs().unwrap_or(0.0);
                    ui.label(format!("Uploading and analysing... ({elapsed:.1}s)"));
                });
            } else {
                let label = if self.workflow.uploaded().is_some() {
                    format!("{} Choose Another File", icons::FOLDER_OPEN)
                } else {
                    format!("{} Choose CSV File", icons::FOLDER_OPEN)
                };
                if ui
                    .add_enabled(self.controller.busy().is_none(), egui::Button::new(label))
                    .clicked()
                {
                    let path = FileDialog::new().add_filter("CSV Files", &["csv"]).pick_file();
                    if let Some(path) = path {
                        intent = Some(Intent::ChooseFile(path));
                    }
                }
            }
        });

        intent
    }

    fn render_analysis_card(&mut self, ui: &mut egui::Ui, analysis: &AnalysisReport) -> Option<Intent> {
        let mut intent = None;

        crate::theme::card_frame(ui).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(icons::CHART_BAR)
                        .size(18.0)
                        .color(crate::theme::ACCENT_COLOR),
                );
                ui.strong("Analysis");
            });
            ui.add_space(crate::theme::SPACING_SMALL);

            let info = &analysis.basic_info;
            ui.label(format!(
                "{} rows, {} columns, {:.2} MB",
                info.row_count, info.column_count, info.file_size_mb
            ));
            ui.add_space(crate::theme::SPACING_MEDIUM);

            render_profile_table(ui, &analysis.columns);

            ui.add_space(crate::theme::SPACING_LARGE);
            self.render_cleaning_controls(ui, &analysis.columns);

            ui.add_space(crate::theme::SPACING_MEDIUM);
            if self.controller.busy() == Some(Stage::Preprocess) {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    let elapsed = self.controller.elapsed_secs().unwrap_or(0.0);
                    ui.label(format!("Preprocessing... ({elapsed:.1}s)"));
                });
            } else if ui
                .add_enabled(
                    self.controller.busy().is_none(),
                    egui::Button::new(format!("{} Run Preprocessing", icons::PLAY)),
                )
                .clicked()
            {
                intent = Some(Intent::RunPreprocessing {
                    choices: self.choices.clone(),
                });
            }
        });

        intent
    }

    fn render_cleaning_controls(&mut self, ui: &mut egui::Ui, columns: &[ColumnProfile]) {
        let needs_attention: Vec<&ColumnProfile> = columns
            .iter()
            .filter(|c| c.is_numeric() && (c.null_count > 0 || c.outlier_count > 0))
            .collect();

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(icons::WRENCH)
                    .size(18.0)
                    .color(crate::theme::ACCENT_COLOR),
            );
            ui.strong("Cleaning");
        });
        ui.add_space(crate::theme::SPACING_SMALL);

        if needs_attention.is_empty() {
            ui.label(
                egui::RichText::new(
                    "No columns need attention. Preprocessing will pass the file through unchanged.",
                )
                .weak(),
            );
            return;
        }

        egui::Grid::new("cleaning_grid")
            .num_columns(3)
            .spacing([30.0, crate::theme::SPACING_SMALL])
            .striped(true)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Column").strong());
                ui.label(egui::RichText::new("Missing Values").strong());
                ui.label(egui::RichText::new("Outliers").strong());
                ui.end_row();

                for column in needs_attention {
                    let choice = self.choices.entry(column.column_name.clone()).or_default();

                    ui.label(&column.column_name);

                    if column.null_count > 0 {
                        egui::ComboBox::from_id_salt(format!("missing_{}", column.column_name))
                            .selected_text(choice.missing.map_or("Leave as is", MissingStrategy::label))
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut choice.missing, None, "Leave as is");
                                for strategy in [
                                    MissingStrategy::Mean,
                                    MissingStrategy::Median,
                                    MissingStrategy::Zero,
                                    MissingStrategy::Remove,
                                ] {
                                    ui.selectable_value(
                                        &mut choice.missing,
                                        Some(strategy),
                                        strategy.label(),
                                    );
                                }
                            });
                    } else {
                        ui.label(egui::RichText::new("—").weak());
                    }

                    if column.outlier_count > 0 {
                        egui::ComboBox::from_id_salt(format!("outliers_{}", column.column_name))
                            .selected_text(choice.outliers.map_or("Leave as is", OutlierStrategy::label))
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut choice.outliers, None, "Leave as is");
                                for strategy in [OutlierStrategy::Cap, OutlierStrategy::Remove] {
                                    ui.selectable_value(
                                        &mut choice.outliers,
                                        Some(strategy),
                                        strategy.label(),
                                    );
                                }
                            });
                    } else {
                        ui.label(egui::RichText::new("—").weak());
                    }

                    ui.end_row();
                }
            });
    }

    fn render_result_card(&mut self, ui: &mut egui::Ui, result: &ResultView) -> Option<Intent> {
        let mut intent = None;

        crate::theme::card_frame(ui).show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(icons::EYE)
                        .size(18.0)
                        .color(crate::theme::ACCENT_COLOR),
                );
                ui.strong("Result");
            });
            ui.add_space(crate::theme::SPACING_SMALL);

            ui.label(format!(
                "{} of {} rows kept, {} removed.",
                result.processed_rows, result.original_rows, result.rows_removed
            ));
            ui.label(
                egui::RichText::new(format!("Processed file: {}", result.processed_file)).weak(),
            );
            ui.add_space(crate::theme::SPACING_MEDIUM);

            if result.preview_rows.is_empty() {
                ui.label(egui::RichText::new("The service returned no preview rows.").weak());
            } else {
                render_preview_table(ui, result);
            }

            ui.add_space(crate::theme::SPACING_MEDIUM);
            if ui
                .add_enabled(
                    self.controller.busy().is_none(),
                    egui::Button::new(format!("{} Save to Database", icons::DATABASE)),
                )
                .clicked()
            {
                intent = Some(Intent::OpenExportPanel);
            }
        });

        intent
    }
}

fn render_profile_table(ui: &mut egui::Ui, columns: &[ColumnProfile]) {
    egui::ScrollArea::horizontal()
        .id_salt("profile_table")
        .show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::initial(120.0).at_least(100.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::auto().at_least(60.0))
                .column(Column::initial(110.0).at_least(80.0))
                .column(Column::remainder())
                .min_scrolled_height(0.0)
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Column");
                    });
                    header.col(|ui| {
                        ui.strong("Type");
                    });
                    header.col(|ui| {
                        ui.strong("Nulls");
                    });
                    header.col(|ui| {
                        ui.strong("Outliers");
                    });
                    header.col(|ui| {
                        ui.strong("Mean");
                    });
                    header.col(|ui| {
                        ui.strong("Median");
                    });
                    header.col(|ui| {
                        ui.strong("Min");
                    });
                    header.col(|ui| {
                        ui.strong("Max");
                    });
                    header.col(|ui| {
                        ui.strong("Std Dev");
                    });
                    header.col(|ui| {
                        ui.strong("Unique");
                    });
                    header.col(|ui| {
                        ui.strong("Most Common");
                    });
                    header.col(|_| {});
                })
                .body(|mut body| {
                    for column in columns {
                        body.row(18.0, |row| {
                            render_profile_row(row, column);
                        });
                    }
                });
        });
}

fn render_profile_row(mut row: egui_extras::TableRow<'_, '_>, column: &ColumnProfile) {
    row.col(|ui| {
        ui.label(egui::RichText::new(&column.column_name).strong());
    });
    row.col(|ui| {
        ui.label(column.data_type.to_string());
    });
    row.col(|ui| {
        ui.label(format!("{} ({:.1}%)", column.null_count, column.null_percentage));
    });
    row.col(|ui| {
        ui.label(format!("{} ({:.1}%)", column.outlier_count, column.outlier_percentage));
    });

    match &column.stats {
        ColumnStats::Numeric(stats) => {
            row.col(|ui| {
                ui.label(fmt_opt(stats.mean));
            });
            row.col(|ui| {
                ui.label(fmt_opt(stats.median));
            });
            row.col(|ui| {
                ui.label(fmt_opt(stats.min));
            });
            row.col(|ui| {
                ui.label(fmt_opt(stats.max));
            });
            row.col(|ui| {
                ui.label(fmt_opt(stats.std));
            });
            row.col(|ui| {
                ui.label("—");
            });
            row.col(|ui| {
                ui.label("—");
            });
        }
        ColumnStats::Categorical(stats) => {
            for _ in 0..5 {
                row.col(|ui| {
                    ui.label("—");
                });
            }
            row.col(|ui| {
                ui.label(stats.unique_count.to_string());
            });
            let top = stats
                .most_common
                .as_ref()
                .map_or_else(|| "—".to_owned(), fmt_cell);
            row.col(|ui| {
                ui.label(top);
            });
        }
    }
    row.col(|_| {});
}

fn render_preview_table(ui: &mut egui::Ui, result: &ResultView) {
    egui::ScrollArea::horizontal()
        .id_salt("preview_table")
        .show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), result.preview_columns.len())
                .column(Column::remainder())
                .min_scrolled_height(0.0)
                .header(20.0, |mut header| {
                    for name in &result.preview_columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                    header.col(|_| {});
                })
                .body(|mut body| {
                    for cells in &result.preview_rows {
                        body.row(18.0, |mut row| {
                            for cell in cells {
                                row.col(|ui| {
                                    ui.label(cell);
                                });
                            }
                            row.col(|_| {});
                        });
                    }
                });
        });
}
