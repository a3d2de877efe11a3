//! The session workflow: login, upload, preprocess, export.
//!
//! One [`Workflow`] owns everything a session accumulates (credential
//! presence, uploaded file and its analysis, processed file handle) and
//! is the only place that mutates it. The interface feeds it [`Intent`]s
//! and [`StageOutcome`]s; it answers with [`Reaction`]s and
//! [`ViewCommand`]s and never touches a widget itself. Every legal
//! transition is an explicit arm here, so the whole flow is testable
//! without a server or a window.

pub mod config;
pub mod export;

pub use config::{ColumnChoice, build_config, seed_choices};
pub use export::ExportForm;

use crate::api::types::{
    AnalysisReport, ConflictPolicy, DbExportRequest, DbTarget, ExportResponse, LoginResponse,
    PreprocessResponse, PreprocessingConfig, UploadResponse,
};
use crate::session::SessionStore;
use crate::view::{ExportSummaryView, ResultView, ViewCommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the session currently stands. Everything except `LoggedOut`
/// implies a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LoggedOut,
    /// Logged in, nothing uploaded yet.
    AwaitingUpload,
    /// An upload succeeded; analysis and per-column controls are up.
    Analyzed,
    /// A preprocessing run succeeded; its result is on screen.
    ResultReady,
    /// The export panel is open for the processed file.
    ExportOpen,
}

/// One of the four remote stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Login,
    Upload,
    Preprocess,
    Export,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Upload => "upload",
            Self::Preprocess => "preprocessing",
            Self::Export => "export",
        }
    }
}

/// What the user just did.
#[derive(Debug, Clone)]
pub enum Intent {
    SubmitLogin {
        username: String,
        password: String,
    },
    Logout,
    ChooseFile(PathBuf),
    RunPreprocessing {
        choices: BTreeMap<String, ColumnChoice>,
    },
    OpenExportPanel,
    SubmitExport {
        destination: DbTarget,
        table_name: String,
        if_exists: ConflictPolicy,
    },
    CloseExportPanel,
}

/// A remote call the interface should run on the workflow's behalf.
#[derive(Debug, Clone)]
pub enum StageRequest {
    Login {
        username: String,
        password: String,
    },
    Upload {
        path: PathBuf,
    },
    Preprocess {
        filepath: String,
        config: PreprocessingConfig,
    },
    Export(DbExportRequest),
}

impl StageRequest {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Login { .. } => Stage::Login,
            Self::Upload { .. } => Stage::Upload,
            Self::Preprocess { .. } => Stage::Preprocess,
            Self::Export(_) => Stage::Export,
        }
    }
}

/// What came back from a remote call.
#[derive(Debug)]
pub enum StageOutcome {
    Login(crate::error::Result<LoginResponse>),
    Upload(crate::error::Result<UploadResponse>),
    Preprocess(crate::error::Result<PreprocessResponse>),
    Export(crate::error::Result<ExportResponse>),
}

impl StageOutcome {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Login(_) => Stage::Login,
            Self::Upload(_) => Stage::Upload,
            Self::Preprocess(_) => Stage::Preprocess,
            Self::Export(_) => Stage::Export,
        }
    }
}

/// Answer to an intent.
#[derive(Debug)]
pub enum Reaction {
    /// Run this remote call and feed the outcome back in.
    Start(StageRequest),
    /// Pure view change, no network involved.
    Update(ViewCommand),
    /// The intent is not legal right now; tell the user why.
    Refuse(String),
    /// Nothing to do.
    Ignore,
}

/// Server-side handle and analysis of the current upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filepath: String,
    pub analysis: AnalysisReport,
}

/// The client half of the four-stage workflow.
pub struct Workflow {
    store: Arc<SessionStore>,
    phase: Phase,
    in_flight: Option<Stage>,
    uploaded: Option<UploadedFile>,
    processed_file: Option<String>,
    export_target: Option<String>,
}

impl Workflow {
    /// Start from whatever the store remembers: a persisted credential
    /// re-enters the workspace without a fresh login.
    pub fn new(store: Arc<SessionStore>) -> Self {
        let phase = if store.is_authenticated() {
            Phase::AwaitingUpload
        } else {
            Phase::LoggedOut
        };
        Self {
            store,
            phase,
            in_flight: None,
            uploaded: None,
            processed_file: None,
            export_target: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_flight(&self) -> Option<Stage> {
        self.in_flight
    }

    pub fn uploaded(&self) -> Option<&UploadedFile> {
        self.uploaded.as_ref()
    }

    pub fn processed_file(&self) -> Option<&str> {
        self.processed_file.as_deref()
    }

    /// Decide what an intent means in the current phase.
    ///
    /// Stage-starting intents are refused while another stage is in
    /// flight; one remote call at a time is the whole concurrency model.
    pub fn handle_intent(&mut self, intent: Intent) -> Reaction {
        if let Some(stage) = self.in_flight
            && starts_stage(&intent)
        {
            return Reaction::Refuse(format!(
                "A {} request is still running.",
                stage.label()
            ));
        }

        match intent {
            Intent::SubmitLogin { username, password } => {
                if self.phase != Phase::LoggedOut {
                    return Reaction::Ignore;
                }
                let username = username.trim().to_owned();
                if username.is_empty() || password.is_empty() {
                    return Reaction::Refuse("Enter a username and password.".to_owned());
                }
                self.in_flight = Some(Stage::Login);
                Reaction::Start(StageRequest::Login { username, password })
            }
            Intent::Logout => {
                if let Err(err) = self.store.clear() {
                    tracing::warn!("Failed to clear stored credential: {err}");
                }
                self.phase = Phase::LoggedOut;
                self.in_flight = None;
                self.uploaded = None;
                self.processed_file = None;
                self.export_target = None;
                tracing::info!("Logged out");
                Reaction::Update(ViewCommand::ShowLogin { notice: None })
            }
            Intent::ChooseFile(path) => {
                if self.phase == Phase::LoggedOut {
                    return Reaction::Ignore;
                }
                self.in_flight = Some(Stage::Upload);
                Reaction::Start(StageRequest::Upload { path })
            }
            Intent::RunPreprocessing { choices } => {
                if self.phase == Phase::LoggedOut {
                    return Reaction::Ignore;
                }
                let Some(uploaded) = &self.uploaded else {
                    return Reaction::Refuse(
                        "No file path available. Please upload the file again.".to_owned(),
                    );
                };
                let config = build_config(&choices);
                self.in_flight = Some(Stage::Preprocess);
                Reaction::Start(StageRequest::Preprocess {
                    filepath: uploaded.filepath.clone(),
                    config,
                })
            }
            Intent::OpenExportPanel => {
                let Some(filepath) = self.processed_file.clone() else {
                    return Reaction::Refuse("Run preprocessing before exporting.".to_owned());
                };
                self.export_target = Some(filepath.clone());
                self.phase = Phase::ExportOpen;
                Reaction::Update(ViewCommand::ShowExportPanel { filepath })
            }
            Intent::SubmitExport {
                destination,
                table_name,
                if_exists,
            } => {
                if self.phase != Phase::ExportOpen {
                    return Reaction::Ignore;
                }
                let table_name = table_name.trim().to_owned();
                if table_name.is_empty() {
                    return Reaction::Refuse("Enter a table name for the export.".to_owned());
                }
                let Some(filepath) = self.export_target.clone() else {
                    return Reaction::Refuse(
                        "No processed file available. Run preprocessing again.".to_owned(),
                    );
                };
                self.in_flight = Some(Stage::Export);
                Reaction::Start(StageRequest::Export(DbExportRequest {
                    filepath,
                    db_config: destination,
                    table_name,
                    if_exists,
                }))
            }
            Intent::CloseExportPanel => {
                if self.phase != Phase::ExportOpen {
                    return Reaction::Ignore;
                }
                if self.in_flight == Some(Stage::Export) {
                    return Reaction::Refuse("An export request is still running.".to_owned());
                }
                self.phase = Phase::ResultReady;
                Reaction::Update(ViewCommand::HideExportPanel)
            }
        }
    }

    /// Fold a finished remote call back into the session.
    ///
    /// The in-flight marker is released before anything else so the
    /// loading indicator clears on every path, and a failed stage leaves
    /// all stored state exactly as it was. Outcomes that land after a
    /// logout belong to a dead session and are dropped.
    pub fn apply_outcome(&mut self, outcome: StageOutcome) -> Option<ViewCommand> {
        if self.in_flight == Some(outcome.stage()) {
            self.in_flight = None;
        }

        match outcome {
            StageOutcome::Login(result) => {
                if self.phase != Phase::LoggedOut {
                    tracing::warn!("Dropping login outcome; session is already live");
                    return None;
                }
                match result {
                    Ok(response) => {
                        if let Err(err) = self.store.set(&response.token) {
                            // Without a persisted credential every later
                            // call would run unauthenticated.
                            tracing::error!("Failed to persist credential: {err}");
                            return Some(ViewCommand::ShowLogin {
                                notice: Some(format!("Could not save the session: {err}")),
                            });
                        }
                        self.phase = Phase::AwaitingUpload;
                        tracing::info!("Logged in");
                        Some(ViewCommand::ShowWorkspace)
                    }
                    Err(err) => Some(ViewCommand::ShowLogin {
                        notice: Some(err.to_string()),
                    }),
                }
            }
            StageOutcome::Upload(result) => {
                if self.phase == Phase::LoggedOut {
                    tracing::warn!("Dropping upload outcome after logout");
                    return None;
                }
                match result {
                    Ok(response) => {
                        let UploadResponse {
                            filepath, analysis, ..
                        } = response;
                        let choices = seed_choices(&analysis.columns);
                        tracing::info!(
                            "Upload analysed: {} rows, {} columns",
                            analysis.basic_info.row_count,
                            analysis.columns.len()
                        );
                        self.uploaded = Some(UploadedFile {
                            filepath,
                            analysis: analysis.clone(),
                        });
                        // A new upload invalidates the previous run's
                        // processed file and any export pointed at it.
                        self.processed_file = None;
                        self.export_target = None;
                        self.phase = Phase::Analyzed;
                        Some(ViewCommand::ShowAnalysis { analysis, choices })
                    }
                    Err(err) => Some(ViewCommand::Alert(format!("Upload failed: {err}"))),
                }
            }
            StageOutcome::Preprocess(result) => {
                if self.phase == Phase::LoggedOut {
                    tracing::warn!("Dropping preprocessing outcome after logout");
                    return None;
                }
                match result {
                    Ok(response) => {
                        let order: Vec<String> = self.uploaded.as_ref().map_or_else(Vec::new, |u| {
                            u.analysis
                                .columns
                                .iter()
                                .map(|c| c.column_name.clone())
                                .collect()
                        });
                        let view = ResultView::from_response(&response, &order);
                        tracing::info!(
                            "Preprocessing removed {} of {} rows",
                            response.rows_removed,
                            response.original_rows
                        );
                        self.processed_file = Some(response.processed_file);
                        // A fresh result supersedes whatever the export
                        // panel was pointed at.
                        self.export_target = None;
                        self.phase = Phase::ResultReady;
                        Some(ViewCommand::ShowResult(view))
                    }
                    Err(err) => Some(ViewCommand::Alert(format!("Preprocessing failed: {err}"))),
                }
            }
            StageOutcome::Export(result) => {
                if self.phase == Phase::LoggedOut {
                    tracing::warn!("Dropping export outcome after logout");
                    return None;
                }
                match result {
                    Ok(response) => {
                        tracing::info!(
                            "Exported {} rows into {}",
                            response.rows_exported,
                            response.table_name
                        );
                        Some(ViewCommand::ExportDone(ExportSummaryView::from_response(
                            &response,
                        )))
                    }
                    Err(err) => Some(ViewCommand::Alert(format!("Export failed: {err}"))),
                }
            }
        }
    }
}

/// True for intents that would start a remote call.
fn starts_stage(intent: &Intent) -> bool {
    matches!(
        intent,
        Intent::SubmitLogin { .. }
            | Intent::ChooseFile(_)
            | Intent::RunPreprocessing { .. }
            | Intent::SubmitExport { .. }
    )
}
