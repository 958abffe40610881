mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::GroupPickerApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::PickerState;

fn main() -> eframe::Result {
    env_logger::init();

    let cli = Cli::parse();
    let contacts_path = cli.contacts.clone();
    let arguments = match cli.into_arguments() {
        Ok(arguments) => arguments,
        Err(e) => {
            log::error!("Invalid arguments: {e:#}");
            std::process::exit(2);
        }
    };

    let mut state = PickerState::new(arguments);
    if let Some(path) = contacts_path {
        match data::loader::load_contacts(&path) {
            Ok(table) => state.set_contacts(table),
            Err(e) => {
                log::error!("Failed to load contacts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([420.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Group Picker – Add Members",
        options,
        Box::new(|_cc| Ok(Box::new(GroupPickerApp::new(state)))),
    )
}
