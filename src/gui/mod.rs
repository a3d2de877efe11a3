//! The egui shell around the workflow state machine.
//!
//! Rendering never mutates the workflow directly. Screens return an
//! [`Intent`] describing what the user asked for, `update` feeds it to
//! [`Workflow::handle_intent`], and the resulting reaction either starts
//! a background request on the [`StageController`] or patches the
//! cached view state via [`SculleryApp::apply_command`].

use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui;
use egui_phosphor::regular as icons;
use secrecy::SecretString;

use crate::api::Transport;
use crate::api::types::AnalysisReport;
use crate::session::SessionStore;
use crate::view::{ExportSummaryView, ResultView, ViewCommand};
use crate::workflow::{ColumnChoice, ExportForm, Intent, Phase, Reaction, Workflow};

pub mod controller;
pub mod export_panel;
pub mod login;
pub mod workspace;

pub use controller::StageController;

pub struct SculleryApp {
    pub workflow: Workflow,
    pub controller: StageController,

    // Login form
    pub username_input: String,
    pub password_input: SecretString,
    pub login_notice: Option<String>,

    // Workspace caches, only ever written by `apply_command`
    pub analysis: Option<AnalysisReport>,
    pub choices: BTreeMap<String, ColumnChoice>,
    pub result: Option<ResultView>,

    // Export panel
    pub export_form: ExportForm,
    pub export_summary: Option<ExportSummaryView>,
    pub export_filepath: Option<String>,

    pub alert: Option<String>,
    pub status: String,
}

impl SculleryApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        crate::theme::apply_scullery_theme(&cc.egui_ctx);

        let workflow = Workflow::new(store);
        let status = if workflow.phase() == Phase::LoggedOut {
            String::new()
        } else {
            "Welcome back. Upload a CSV file to begin.".to_owned()
        };

        Self {
            workflow,
            controller: StageController::new(transport),
            username_input: String::new(),
            password_input: SecretString::default(),
            login_notice: None,
            analysis: None,
            choices: BTreeMap::new(),
            result: None,
            export_form: ExportForm::default(),
            export_summary: None,
            export_filepath: None,
            alert: None,
            status,
        }
    }

    fn handle(&mut self, ctx: &egui::Context, intent: Intent) {
        match self.workflow.handle_intent(intent) {
            Reaction::Start(request) => self.controller.dispatch(ctx.clone(), request),
            Reaction::Update(command) => self.apply_command(command),
            Reaction::Refuse(message) => self.alert = Some(message),
            Reaction::Ignore => {}
        }
    }

    fn apply_command(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::ShowLogin { notice } => {
                self.login_notice = notice;
                self.password_input = SecretString::default();
                self.analysis = None;
                self.choices.clear();
                self.result = None;
                self.export_summary = None;
                self.export_filepath = None;
                self.status.clear();
            }
            ViewCommand::ShowWorkspace => {
                self.login_notice = None;
                self.password_input = SecretString::default();
                self.analysis = None;
                self.choices.clear();
                self.result = None;
                self.export_summary = None;
                self.export_filepath = None;
                self.status = "Upload a CSV file to begin.".to_owned();
            }
            ViewCommand::ShowAnalysis { analysis, choices } => {
                self.status = format!(
                    "{} Analysed {} columns across {} rows.",
                    icons::CHECK_CIRCLE,
                    analysis.basic_info.column_count,
                    analysis.basic_info.row_count,
                );
                self.analysis = Some(analysis);
                self.choices = choices;
                self.result = None;
                self.export_summary = None;
                self.export_filepath = None;
            }
            ViewCommand::ShowResult(result) => {
                self.status = format!(
                    "{} Preprocessing complete: {} rows kept, {} removed.",
                    icons::CHECK_CIRCLE,
                    result.processed_rows,
                    result.rows_removed,
                );
                self.result = Some(result);
                self.export_summary = None;
                self.export_filepath = None;
            }
            ViewCommand::ShowExportPanel { filepath } => {
                self.export_summary = None;
                self.export_filepath = Some(filepath);
            }
            ViewCommand::HideExportPanel => {
                self.export_summary = None;
            }
            ViewCommand::ExportDone(summary) => {
                self.status = format!(
                    "{} Exported {} rows to {}.",
                    icons::CHECK_CIRCLE,
                    summary.rows_exported,
                    summary.table_name,
                );
                self.export_summary = Some(summary);
            }
            ViewCommand::Alert(message) => {
                self.alert = Some(message);
            }
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert.clone() else {
            return;
        };
        let mut dismissed = false;

        egui::Window::new(format!("{} Notice", icons::WARNING))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.label(message);
                ui.add_space(crate::theme::SPACING_MEDIUM);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.alert = None;
        }
    }
}

impl eframe::App for SculleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(outcome) = self.controller.poll()
            && let Some(command) = self.workflow.apply_outcome(outcome)
        {
            self.apply_command(command);
        }

        let mut intent = match self.workflow.phase() {
            Phase::LoggedOut => self.render_login(ctx),
            _ => self.render_workspace(ctx),
        };

        if self.workflow.phase() == Phase::ExportOpen
            && let Some(panel_intent) = self.render_export_panel(ctx)
        {
            intent = Some(panel_intent);
        }

        self.render_alert(ctx);

        if let Some(intent) = intent {
            self.handle(ctx, intent);
        }

        if self.controller.busy().is_some() {
            ctx.request_repaint();
        }
    }
}
