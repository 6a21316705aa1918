#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use data_master::{DataMasterApp, SessionConfig};

fn main() -> eframe::Result {
    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::from_json_file(&path).unwrap_or_else(|err| {
            eprintln!("Ignoring config {}: {}", path, err);
            SessionConfig::default()
        }),
        None => SessionConfig::default(),
    };
    data_master::logging::init_logging(&config.log_filter);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("Data Master"),
        ..Default::default()
    };
    eframe::run_native(
        "Data Master",
        native_options,
        Box::new(|cc| Ok(Box::new(DataMasterApp::new(cc, config)))),
    )
}
