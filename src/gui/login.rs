use eframe::egui;
use egui_phosphor::regular as icons;
use secrecy::{ExposeSecret as _, SecretString};

use crate::gui::SculleryApp;
use crate::workflow::{Intent, Stage};

impl SculleryApp {
    pub(crate) fn render_login(&mut self, ctx: &egui::Context) -> Option<Intent> {
        let mut intent = None;

        egui::CentralPanel::default()
            .frame(crate::theme::central_panel_frame())
            .show(ctx, |ui| {
                ui.add_space(crate::theme::SPACING_HUGE * 2.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new(icons::CHART_BAR)
                            .size(48.0)
                            .color(crate::theme::ACCENT_COLOR),
                    );
                    ui.heading(egui::RichText::new("Scullery").size(28.0).strong());
                    ui.label(egui::RichText::new("CSV in, clean tables out.").weak());
                    ui.add_space(crate::theme::SPACING_LARGE);

                    ui.scope(|ui| {
                        ui.set_max_width(340.0);
                        crate::theme::card_frame(ui).show(ui, |ui| {
                            intent = self.render_login_form(ui);
                        });
                    });
                });
            });

        intent
    }

    fn render_login_form(&mut self, ui: &mut egui::Ui) -> Option<Intent> {
        let mut intent = None;

        egui::Grid::new("login_grid")
            .num_columns(2)
            .spacing([20.0, crate::theme::SPACING_MEDIUM])
            .show(ui, |ui| {
                ui.label("Username:");
                ui.add(egui::TextEdit::singleline(&mut self.username_input).desired_width(200.0));
                ui.end_row();

                ui.label("Password:");
                let mut pass = self.password_input.expose_secret().to_owned();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut pass)
                        .password(true)
                        .desired_width(200.0),
                );
                if response.changed() {
                    self.password_input = SecretString::from(pass);
                }
                ui.end_row();
            });

        ui.add_space(crate::theme::SPACING_MEDIUM);

        if self.controller.busy() == Some(Stage::Login) {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label("Signing in...");
            });
        } else if ui
            .button(format!("{} Sign In", icons::SIGN_IN))
            .clicked()
        {
            intent = Some(Intent::SubmitLogin {
                username: self.username_input.clone(),
                password: self.password_input.expose_secret().to_owned(),
            });
        }

        if let Some(notice) = &self.login_notice {
            ui.add_space(crate::theme::SPACING_SMALL);
            ui.label(
                egui::RichText::new(format!("{} {notice}", icons::WARNING))
                    .color(ui.visuals().error_fg_color),
            );
        }

        intent
    }
}
