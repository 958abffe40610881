use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader::{load_contacts, load_member_ids};
use crate::state::PickerState;

// ---------------------------------------------------------------------------
// Left side panel – account and membership summary
// ---------------------------------------------------------------------------

/// Render the left panel: the target account, the ids excluded from the
/// list, and the contacts added in this session.
pub fn side_panel(ui: &mut Ui, state: &mut PickerState) {
    ui.heading("Group");
    ui.separator();

    ui.strong("Account");
    match &state.arguments.account {
        Some(account) => ui.label(account.to_string()),
        None => ui.label(RichText::new("All accounts").weak()),
    };
    ui.add_space(6.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut state.section_headers_enabled, "Sections");
        ui.checkbox(&mut state.photo_loader_enabled, "Tiles");
    });
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let excluded = &state.arguments.raw_contact_ids;
            egui::CollapsingHeader::new(
                RichText::new(format!("Already in group  ({})", excluded.len())).strong(),
            )
            .id_salt("excluded_ids")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for id in excluded {
                    ui.monospace(id);
                }
            });

            egui::CollapsingHeader::new(
                RichText::new(format!("Added this session  ({})", state.added.len())).strong(),
            )
            .id_salt("added_ids")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for id in &state.added {
                    ui.monospace(id.to_string());
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut PickerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open contacts…").clicked() {
                open_contacts_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open group members…").clicked() {
                open_members_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Save session…").clicked() {
                save_session_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(contacts) = &state.contacts {
            ui.label(format!(
                "{} contacts loaded, {} can be added",
                contacts.len(),
                state.count()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_contacts_dialog(state: &mut PickerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open contacts")
        .add_filter("Supported files", &["parquet", "pq", "json", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        match load_contacts(&path) {
            Ok(table) => state.set_contacts(table),
            Err(e) => {
                log::error!("Failed to load contacts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn open_members_dialog(state: &mut PickerState) {
    let file = rfd::FileDialog::new()
        .set_title("Open group members")
        .add_filter("Member ids", &["json", "txt"])
        .pick_file();

    if let Some(path) = file {
        match load_member_ids(&path) {
            Ok(ids) => {
                state.status_message = None;
                state.set_member_ids(ids);
            }
            Err(e) => {
                log::error!("Failed to load group members: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_session_dialog(state: &mut PickerState) {
    let file = rfd::FileDialog::new()
        .set_title("Save session")
        .add_filter("JSON", &["json"])
        .set_file_name("session.json")
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.arguments.save(&path) {
            log::error!("Failed to save session: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
