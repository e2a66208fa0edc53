use app_core::event::EventQueue;

use crate::app::common::{parse_hex_color, to_hex};
use crate::app::events::{AddPaletteColour, ApplyPalette, CreatePalette, SelectPalette};
use crate::EguiApp;

use super::PaletteBook;

const SWATCHES_PER_ROW: usize = 5;

impl PaletteBook {
    /// Palette selection and editing. Colour edits are applied directly and
    /// reported through the return value.
    pub(crate) fn render(
        &mut self,
        new_palette_name: &mut String,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) -> bool {
        let mut changed = false;
        ui.heading("Colour Palettes");

        let active = self.active_name().to_owned();
        egui::ComboBox::from_label("Active Palette")
            .selected_text(&active)
            .show_ui(ui, |ui| {
                for name in self.names() {
                    if ui.selectable_label(name == active, name).clicked() && name != active {
                        event_queue.queue_event(Box::new(SelectPalette::new(name.to_owned())));
                    }
                }
            });

        ui.label(egui::RichText::new("Edit Palette Colours").strong());
        let mut edits = Vec::new();
        egui::Grid::new("palette_colours").show(ui, |ui| {
            for (i, hex) in self.active_colors().iter().enumerate() {
                let mut rgb = parse_hex_color(hex).unwrap_or_default();
                if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
                    edits.push((i, to_hex(rgb)));
                }
                if (i + 1) % SWATCHES_PER_ROW == 0 {
                    ui.end_row();
                }
            }
        });
        for (i, hex) in edits {
            match self.set_color(i, &hex) {
                Ok(()) => changed = true,
                Err(err) => log::error!("{err}"),
            }
        }

        ui.horizontal(|ui| {
            if ui.button("Apply Palette to Groups").clicked() {
                event_queue.queue_event(Box::new(ApplyPalette::new()));
            }
            if ui.button("➕ Add Colour to Palette").clicked() {
                event_queue.queue_event(Box::new(AddPaletteColour::new()));
            }
        });

        ui.horizontal(|ui| {
            let lab = ui.label("New Palette Name");
            ui.text_edit_singleline(new_palette_name).labelled_by(lab.id);
        });
        if ui.button("Create New Palette").clicked() {
            event_queue.queue_event(Box::new(CreatePalette::new(new_palette_name.clone())));
        }
        changed
    }
}
