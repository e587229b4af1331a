#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod export;
mod render;
mod schedule;
mod ui;

use eframe::egui;
use env_logger::Env;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 900.0])
        .with_min_inner_size([900.0, 640.0])
        .with_title("Weekly Availability");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "WeekGrid",
        options,
        Box::new(|cc| Ok(Box::new(ui::WeekGridApp::new(cc)?))),
    )
}
