//! Desktop client for the RentAI document question-answering service.

mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime::spawn_backend_thread;
use controller::events::UiEvent;
use ui::app::DocChatApp;

#[derive(Debug, Parser)]
#[command(name = "rentai-desktop", about = "Chat with uploaded PDF documents")]
struct Args {
    /// Base URL of the question-answering backend.
    #[arg(long, default_value = "http://127.0.0.1:7860")]
    server_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(args.server_url, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RentAI Pro")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([840.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "RentAI Pro",
        options,
        Box::new(|_cc| Ok(Box::new(DocChatApp::new(cmd_tx, ui_rx)))),
    )
}
