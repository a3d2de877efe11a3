//! Presentation models handed from the workflow to the interface.
//!
//! The interface never interprets wire payloads itself; the workflow
//! translates each outcome into one of these commands and the screens
//! just render what they are given.

use crate::api::types::{AnalysisReport, ExportResponse, PreprocessResponse};
use crate::utils::fmt_cell;
use crate::workflow::config::ColumnChoice;
use std::collections::BTreeMap;

/// Instruction to the interface after an intent or an outcome.
#[derive(Debug, Clone)]
pub enum ViewCommand {
    /// Show the login screen. `notice` carries an inline failure message
    /// under the form, not a popup.
    ShowLogin { notice: Option<String> },
    /// Show the empty workspace, ready for an upload.
    ShowWorkspace,
    /// Show a fresh analysis with its pre-seeded per-column choices.
    ShowAnalysis {
        analysis: AnalysisReport,
        choices: BTreeMap<String, ColumnChoice>,
    },
    /// Show a preprocessing result below the analysis.
    ShowResult(ResultView),
    /// Open the export panel for the named processed file.
    ShowExportPanel { filepath: String },
    /// Close the export panel without exporting.
    HideExportPanel,
    /// Close the panel's form and show the export summary.
    ExportDone(ExportSummaryView),
    /// Blocking notification the user has to dismiss.
    Alert(String),
}

/// A preprocessing run, ready to render: counts plus the preview grid
/// with every cell already turned into display text.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub original_rows: u64,
    pub processed_rows: u64,
    pub rows_removed: u64,
    pub processed_file: String,
    pub preview_columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

impl ResultView {
    /// Shape the preview using the analysis column order; anything the
    /// service sends that the analysis never named goes last.
    pub fn from_response(response: &PreprocessResponse, column_order: &[String]) -> Self {
        let mut preview_columns: Vec<String> = column_order
            .iter()
            .filter(|name| response.preview.iter().any(|row| row.contains_key(*name)))
            .cloned()
            .collect();
        for row in &response.preview {
            for key in row.keys() {
                if !preview_columns.contains(key) {
                    preview_columns.push(key.clone());
                }
            }
        }

        let preview_rows = response
            .preview
            .iter()
            .map(|row| {
                preview_columns
                    .iter()
                    .map(|name| row.get(name).map_or_else(|| "—".to_owned(), fmt_cell))
                    .collect()
            })
            .collect();

        Self {
            original_rows: response.original_rows,
            processed_rows: response.processed_rows,
            rows_removed: response.rows_removed,
            processed_file: response.processed_file.clone(),
            preview_columns,
            preview_rows,
        }
    }
}

/// A finished export, ready to render under the collapsed form.
#[derive(Debug, Clone)]
pub struct ExportSummaryView {
    pub engine_label: &'static str,
    pub table_name: String,
    pub rows_exported: u64,
    pub db_file: Option<String>,
}

impl ExportSummaryView {
    pub fn from_response(response: &ExportResponse) -> Self {
        Self {
            engine_label: response.db_type.label(),
            table_name: response.table_name.clone(),
            rows_exported: response.rows_exported,
            db_file: response.db_file.clone(),
        }
    }
}
