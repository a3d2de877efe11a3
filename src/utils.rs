//! Small shared helpers: the tokio runtime the worker threads block on,
//! and display formatting for values coming back from the service.

use eframe::egui;
use std::sync::LazyLock;

/// Shared tokio runtime for worker threads.
///
/// The GUI itself is synchronous; every network call runs on a spawned
/// thread that blocks on this runtime, so one multi-threaded runtime for
/// the whole process is enough.
pub static TOKIO_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Formats an optional f64 to 2 decimal places, or returns "—" if None or non-finite.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.2}"),
        _ => "—".to_owned(),
    }
}

/// Formats a preview cell for display. Whole floats lose their trailing
/// `.0` so imputed integer columns still read as integers.
pub fn fmt_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "—".to_owned(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        serde_json::Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Renders the footer status line, if there is anything to say.
pub fn render_status_message(ui: &mut egui::Ui, status: &str) {
    if !status.is_empty() {
        ui.label(egui::RichText::new(status).weak());
    }
}
