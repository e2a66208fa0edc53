use svg_export::LegendAnchor;

use crate::app::common::{parse_hex_color, to_hex};

use super::{
    ColumnChoice, FileSettings, GlobalSettings, LineStyle, LineStyleChoice, Marker, MarkerChoice,
    Override, ALPHA_RANGE, DPI_RANGE, FIG_HEIGHT_RANGE, FIG_WIDTH_RANGE, LINE_WIDTH_RANGE,
    MARKER_SIZE_RANGE,
};

const USE_GLOBAL: &str = "Use Global";
const NONE: &str = "None";

impl GlobalSettings {
    /// Figure settings and global file defaults. Global columns are offered
    /// from the first loaded file.
    pub(crate) fn render(&mut self, first_file: &str, columns: &[&str], ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        ui.heading("Global Plot Settings");
        egui::Grid::new("global_plot_settings")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Figure Width");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.fig_width).range(FIG_WIDTH_RANGE).speed(0.1))
                    .changed();
                ui.end_row();
                ui.label("Figure Height");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.fig_height).range(FIG_HEIGHT_RANGE).speed(0.1))
                    .changed();
                ui.end_row();
                ui.label("DPI");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.dpi).range(DPI_RANGE))
                    .changed();
                ui.end_row();
                ui.label("Title");
                changed |= ui.text_edit_singleline(&mut self.title).changed();
                ui.end_row();
                ui.label("X Label");
                changed |= ui.text_edit_singleline(&mut self.x_label).changed();
                ui.end_row();
                ui.label("Y Label");
                changed |= ui.text_edit_singleline(&mut self.y_label).changed();
                ui.end_row();
                ui.label("Legend Location");
                egui::ComboBox::from_id_salt("legend_location")
                    .selected_text(self.legend.label())
                    .show_ui(ui, |ui| {
                        for anchor in LegendAnchor::ALL {
                            changed |= ui
                                .selectable_value(&mut self.legend, anchor, anchor.label())
                                .changed();
                        }
                    });
                ui.end_row();
            });

        ui.heading("Global File Defaults");
        ui.label(egui::RichText::new(format!("Columns from: {first_file}")).weak());
        egui::Grid::new("global_file_defaults")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Global X Column");
                changed |= column_combo(ui, "global_x", &mut self.x_column, columns);
                ui.end_row();
                ui.label("Global Y Column");
                changed |= column_combo(ui, "global_y", &mut self.y_column, columns);
                ui.end_row();
                ui.label("Global Color");
                changed |= hex_color_edit(ui, &mut self.color);
                ui.end_row();
                ui.label("Global Line Style");
                egui::ComboBox::from_id_salt("global_linestyle")
                    .selected_text(self.linestyle.map(|ls| ls.symbol()).unwrap_or(NONE))
                    .show_ui(ui, |ui| {
                        for ls in LineStyle::ALL {
                            changed |= ui
                                .selectable_value(&mut self.linestyle, Some(ls), ls.symbol())
                                .changed();
                        }
                        changed |= ui.selectable_value(&mut self.linestyle, None, NONE).changed();
                    });
                ui.end_row();
                ui.label("Global Line Width");
                changed |= ui
                    .add(egui::Slider::new(&mut self.linewidth, LINE_WIDTH_RANGE))
                    .changed();
                ui.end_row();
                ui.label("Global Alpha");
                changed |= ui
                    .add(egui::Slider::new(&mut self.alpha, ALPHA_RANGE))
                    .changed();
                ui.end_row();
            });
        changed
    }
}

impl FileSettings {
    /// Override form of one file. `columns` are the file's own columns.
    pub(crate) fn render(&mut self, columns: &[&str], ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        changed |= ui.checkbox(&mut self.show, "Show").changed();
        ui.horizontal(|ui| {
            let lab = ui.label("Legend");
            changed |= ui
                .text_edit_singleline(&mut self.legend)
                .labelled_by(lab.id)
                .changed();
        });

        egui::Grid::new("file_overrides").num_columns(2).show(ui, |ui| {
            ui.label("Override X");
            changed |= column_choice_combo(ui, "x", &mut self.x, columns);
            ui.end_row();
            ui.label("Override Y");
            changed |= column_choice_combo(ui, "y", &mut self.y, columns);
            ui.end_row();

            changed |= ui
                .checkbox(&mut self.color.enabled, "Override Colour")
                .changed();
            changed |= hex_color_edit(ui, &mut self.color.value);
            ui.end_row();

            ui.label("Override Line Style");
            let selected = match self.linestyle {
                LineStyleChoice::UseGlobal => USE_GLOBAL,
                LineStyleChoice::None => NONE,
                LineStyleChoice::Style(ls) => ls.symbol(),
            };
            egui::ComboBox::from_id_salt("linestyle")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.linestyle, LineStyleChoice::UseGlobal, USE_GLOBAL)
                        .changed();
                    for ls in LineStyle::ALL {
                        changed |= ui
                            .selectable_value(&mut self.linestyle, LineStyleChoice::Style(ls), ls.symbol())
                            .changed();
                    }
                    changed |= ui
                        .selectable_value(&mut self.linestyle, LineStyleChoice::None, NONE)
                        .changed();
                });
            ui.end_row();

            changed |= slider_override(ui, "Override Line Width", &mut self.linewidth, LINE_WIDTH_RANGE);
            ui.end_row();
            changed |= slider_override(ui, "Override Alpha", &mut self.alpha, ALPHA_RANGE);
            ui.end_row();

            ui.label("Marker");
            let selected = match self.marker {
                MarkerChoice::UseGlobal => USE_GLOBAL,
                MarkerChoice::None => NONE,
                MarkerChoice::Marker(m) => m.symbol(),
            };
            egui::ComboBox::from_id_salt("marker")
                .selected_text(selected)
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.marker, MarkerChoice::UseGlobal, USE_GLOBAL)
                        .changed();
                    changed |= ui
                        .selectable_value(&mut self.marker, MarkerChoice::None, NONE)
                        .changed();
                    for m in Marker::ALL {
                        changed |= ui
                            .selectable_value(&mut self.marker, MarkerChoice::Marker(m), m.symbol())
                            .changed();
                    }
                });
            ui.end_row();

            changed |= slider_override(ui, "Override Marker Size", &mut self.markersize, MARKER_SIZE_RANGE);
            ui.end_row();

            changed |= ui
                .checkbox(&mut self.zorder.enabled, "Override Z Order")
                .changed();
            changed |= ui.add(egui::DragValue::new(&mut self.zorder.value)).changed();
            ui.end_row();
        });
        changed
    }
}

fn slider_override(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut Override<f64>,
    range: std::ops::RangeInclusive<f64>,
) -> bool {
    let toggled = ui.checkbox(&mut value.enabled, label).changed();
    let moved = ui.add(egui::Slider::new(&mut value.value, range)).changed();
    toggled || moved
}

fn column_combo(ui: &mut egui::Ui, salt: &str, selected: &mut Option<String>, columns: &[&str]) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_salt(salt)
        .selected_text(selected.as_deref().unwrap_or(""))
        .show_ui(ui, |ui| {
            for col in columns {
                let is_selected = selected.as_deref() == Some(*col);
                if ui.selectable_label(is_selected, *col).clicked() && !is_selected {
                    *selected = Some(col.to_string());
                    changed = true;
                }
            }
        });
    changed
}

fn column_choice_combo(
    ui: &mut egui::Ui,
    salt: &str,
    choice: &mut ColumnChoice,
    columns: &[&str],
) -> bool {
    let mut changed = false;
    let text = match choice {
        ColumnChoice::UseGlobal => USE_GLOBAL.to_string(),
        ColumnChoice::Column(name) => name.clone(),
    };
    egui::ComboBox::from_id_salt(salt)
        .selected_text(text)
        .show_ui(ui, |ui| {
            changed |= ui
                .selectable_value(choice, ColumnChoice::UseGlobal, USE_GLOBAL)
                .changed();
            for col in columns {
                changed |= ui
                    .selectable_value(choice, ColumnChoice::Column(col.to_string()), *col)
                    .changed();
            }
        });
    changed
}

/// Colour picker bound to a hex string.
pub(crate) fn hex_color_edit(ui: &mut egui::Ui, hex: &mut String) -> bool {
    let mut rgb = parse_hex_color(hex).unwrap_or_default();
    if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
        *hex = to_hex(rgb);
        return true;
    }
    false
}
