use eframe::egui::{self, Align, Align2, Color32, FontId, Layout, RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{LetterTilePalette, tile_letter};
use crate::state::PickerState;

const ROW_HEIGHT: f32 = 36.0;
const TILE_SIZE: f32 = 28.0;

// ---------------------------------------------------------------------------
// Candidate list (central panel)
// ---------------------------------------------------------------------------

/// Render the candidate contacts. Returns the list position that was clicked.
pub fn contact_list(ui: &mut Ui, state: &mut PickerState, tiles: &LetterTilePalette) -> Option<usize> {
    if state.view.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a contacts file to pick group members  (File → Open contacts…)");
        });
        return None;
    }

    let count = state.count();
    if count == 0 {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No contacts left to add.");
        });
        return None;
    }

    let show_sections = state.section_headers_enabled;
    let show_tiles = state.photo_loader_enabled;
    let mut clicked = None;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .sense(Sense::click())
        .vscroll(true)
        .cell_layout(Layout::left_to_right(Align::Center));
    if !state.visible_scrollbar_enabled {
        table = table.scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden);
    }
    if show_sections {
        table = table.column(Column::exact(20.0));
    }
    if show_tiles {
        table = table.column(Column::exact(TILE_SIZE + 8.0));
    }

    table
        .column(Column::remainder())
        .body(|body| {
            body.rows(ROW_HEIGHT, count, |mut row| {
                let position = row.index();
                let Some(item) = state.item(position) else {
                    return;
                };

                if show_sections {
                    row.col(|ui| {
                        if let Some(letter) = item.section_header {
                            ui.label(RichText::new(letter.to_string()).strong());
                        }
                    });
                }
                if show_tiles {
                    row.col(|ui| {
                        let key = item.lookup_key.as_deref().or(item.display_name.as_deref());
                        letter_tile(
                            ui,
                            tiles.color_for(key),
                            tile_letter(item.display_name.as_deref()),
                            item.photo_id.is_some(),
                        );
                    });
                }
                row.col(|ui| {
                    let label = match &item.display_name {
                        Some(name) => ui.label(name),
                        None => ui.label(RichText::new("(no name)").italics().weak()),
                    };
                    if let Some(id) = item.contact_id {
                        label.on_hover_text(format!("contact {id}"));
                    }
                });

                if row.response().clicked() {
                    clicked = Some(position);
                }
            });
        });

    clicked
}

/// A round tile with the contact's initial. Contacts with a photo get a ring.
fn letter_tile(ui: &mut Ui, color: Color32, letter: char, has_photo: bool) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(TILE_SIZE, TILE_SIZE), Sense::hover());
    let painter = ui.painter();
    painter.circle_filled(rect.center(), TILE_SIZE / 2.0, color);
    if has_photo {
        painter.circle_stroke(rect.center(), TILE_SIZE / 2.0 - 1.0, egui::Stroke::new(1.5, Color32::WHITE));
    }
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        letter,
        FontId::proportional(14.0),
        Color32::WHITE,
    );
}
