use app_core::event::EventQueue;
use egui::Color32;

use crate::app::events::{ReloadFiles, RemoveFile, SetSkipRows};
use crate::EguiApp;

use super::FileRegistry;

impl FileRegistry {
    /// Upload list with per-file errors. Returns true if the user asked to
    /// add files.
    pub(crate) fn render(&self, event_queue: &mut EventQueue<EguiApp>, ui: &mut egui::Ui) -> bool {
        let mut add_requested = false;
        ui.horizontal(|ui| {
            add_requested = ui.button("Add Files…").clicked();
            if ui
                .add_enabled(!self.is_empty(), egui::Button::new("⟳ Reload"))
                .on_hover_text("parse all files again")
                .clicked()
            {
                event_queue.queue_event(Box::new(ReloadFiles::new()));
            }
        });

        ui.horizontal(|ui| {
            let mut skip_rows = self.skip_rows();
            let lab = ui.label("Rows to skip");
            let resp = ui
                .add(egui::DragValue::new(&mut skip_rows).range(0..=Self::MAX_SKIP_ROWS))
                .labelled_by(lab.id);
            if resp.changed() {
                event_queue.queue_event(Box::new(SetSkipRows::new(skip_rows)));
            }
        });

        for (fid, upload) in self.iter() {
            ui.push_id(fid.index(), |ui| {
                ui.horizontal(|ui| {
                    if ui.small_button("🗑").on_hover_text("remove file").clicked() {
                        event_queue.queue_event(Box::new(RemoveFile::new(fid)));
                    }
                    ui.add(egui::Label::new(upload.file_name()).truncate())
                        .on_hover_text(upload.path.display().to_string());
                });
                if let Some(err) = upload.error() {
                    ui.colored_label(
                        Color32::RED,
                        format!("Error loading {}: {}", upload.file_name(), err),
                    );
                }
            });
        }
        add_requested
    }
}
