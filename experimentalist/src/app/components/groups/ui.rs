use std::collections::HashMap;

use app_core::event::EventQueue;

use crate::app::components::settings::hex_color_edit;
use crate::app::components::{FileId, FileRegistry, FileSettings};
use crate::app::events::{AddGroup, MoveFile, RenameGroup};
use crate::EguiApp;

use super::{GroupBoard, GroupEditor};

impl GroupBoard {
    /// Group names and colours, and for every file its target group and
    /// style overrides. Structural changes are queued as events; colour and
    /// override edits are applied directly and reported through the return
    /// value.
    pub(crate) fn render(
        &mut self,
        files: &FileRegistry,
        file_settings: &mut HashMap<FileId, FileSettings>,
        editor: &mut GroupEditor,
        event_queue: &mut EventQueue<EguiApp>,
        ui: &mut egui::Ui,
    ) -> bool {
        if editor.name_buffers.len() != self.groups.len() {
            editor.sync(self);
        }
        let mut changed = false;
        let mut color_edits = Vec::new();

        ui.heading("Colour Groups");
        if ui.button("➕ Add Colour Group").clicked() {
            event_queue.queue_event(Box::new(AddGroup::new()));
        }

        let names: Vec<&str> = self.names().collect();
        for (gid, grp) in self.groups.iter().enumerate() {
            ui.separator();
            ui.push_id(("group", gid), |ui| {
                ui.horizontal(|ui| {
                    let lab = ui.label("Group Name");
                    let resp = ui
                        .text_edit_singleline(&mut editor.name_buffers[gid])
                        .labelled_by(lab.id);
                    if resp.lost_focus() && editor.name_buffers[gid] != grp.name {
                        event_queue.queue_event(Box::new(RenameGroup::new(
                            gid,
                            editor.name_buffers[gid].clone(),
                        )));
                    }
                    let mut color = grp.color.clone();
                    if hex_color_edit(ui, &mut color) {
                        color_edits.push((gid, color));
                    }
                });
                ui.label(egui::RichText::new(&grp.name).heading());

                for fid in grp.files.iter() {
                    let Some(upload) = files.get(*fid) else {
                        log::warn!("{fid:?} is grouped but not registered");
                        continue;
                    };
                    ui.push_id(fid.index(), |ui| {
                        ui.horizontal(|ui| {
                            let current = self.move_selection(*fid).unwrap_or(grp.name.as_str());
                            egui::ComboBox::from_id_salt("move_to")
                                .selected_text(current)
                                .width(120.0)
                                .show_ui(ui, |ui| {
                                    for name in names.iter() {
                                        if ui.selectable_label(*name == current, *name).clicked()
                                            && *name != grp.name
                                        {
                                            event_queue.queue_event(Box::new(MoveFile::new(
                                                *fid,
                                                name.to_string(),
                                            )));
                                        }
                                    }
                                });
                            egui::CollapsingHeader::new(upload.file_name())
                                .id_salt(("file", fid.index()))
                                .show(ui, |ui| {
                                    let (Some(settings), Some(table)) =
                                        (file_settings.get_mut(fid), upload.table())
                                    else {
                                        return;
                                    };
                                    changed |= settings.render(&table.column_names(), ui);
                                });
                        });
                    });
                }
            });
        }

        for (gid, color) in color_edits {
            match self.set_group_color(gid, &color) {
                Ok(()) => changed = true,
                Err(err) => log::error!("{err}"),
            }
        }
        changed
    }
}
