use eframe::egui;

use crate::color::LetterTilePalette;
use crate::state::{PickedMembers, PickerState};
use crate::ui::{list, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GroupPickerApp {
    pub state: PickerState,
    tiles: LetterTilePalette,
}

impl GroupPickerApp {
    pub fn new(state: PickerState) -> Self {
        Self {
            state,
            tiles: LetterTilePalette::default(),
        }
    }
}

impl eframe::App for GroupPickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: group summary ----
        egui::SidePanel::left("group_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: candidates ----
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| list::contact_list(ui, &mut self.state, &self.tiles))
            .inner;

        if let Some(position) = clicked {
            let mut picked = PickedMembers::default();
            self.state.on_item_click(position, &mut picked);
            for contact_id in picked.0 {
                self.state.add_member(contact_id);
            }
        }
    }
}
