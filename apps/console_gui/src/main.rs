use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod ui;

use crate::backend_bridge::commands::BackendCommand;
use crate::backend_bridge::runtime::spawn_backend_worker;
use crate::controller::events::UiEvent;
use crate::ui::{ConsoleApp, PersistedConsoleSettings, SETTINGS_STORAGE_KEY};

/// Operator console for a speech-corpus / model-training backend.
#[derive(Debug, Parser)]
#[command(name = "persephone-console")]
struct Args {
    /// Base URL of the backend API.
    #[arg(long, env = "CONSOLE_SERVER_URL", default_value = "http://127.0.0.1:8080")]
    server_url: String,

    /// Log filter, e.g. "info" or "console_gui=debug".
    #[arg(long, default_value = "info")]
    log_filter: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter.as_str())
        .init();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    spawn_backend_worker(cmd_rx, ui_tx, args.server_url.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Persephone Operator Console")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([860.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Persephone Operator Console",
        options,
        Box::new(move |cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedConsoleSettings>(&text).ok())
            });
            Ok(Box::new(ConsoleApp::new(
                cmd_tx,
                ui_rx,
                args.server_url,
                persisted,
            )))
        }),
    )
}
