//! Scullery desktop entry point.
//!
//! Wires the session store and the HTTP transport together and hands both
//! to the egui shell. The app is a pure client: every stage of the
//! workflow runs on the companion preprocessing service.

#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use eframe::egui;
use scullery::api::{ApiClient, DEFAULT_BASE_URL, Transport};
use scullery::gui::SculleryApp;
use scullery::session::SessionStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    scullery::logging::init()?;

    let store = Arc::new(SessionStore::open()?);
    let transport: Arc<dyn Transport> =
        Arc::new(ApiClient::new(DEFAULT_BASE_URL, Arc::clone(&store)));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scullery")
            .with_inner_size([1180.0, 800.0])
            .with_min_inner_size([900.0, 620.0]),
        ..Default::default()
    };

    eframe::run_native(
        "scullery",
        options,
        Box::new(|cc| Ok(Box::new(SculleryApp::new(cc, store, transport)))),
    )?;
    Ok(())
}
