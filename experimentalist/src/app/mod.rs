pub mod common;
mod components;
pub mod config;
mod events;
pub mod session;

use std::time::Duration;

use app_core::event::EventQueue;
use config::Config;
use events::{AddFiles, AddFilesRequested, ResetSession, SavePlotRequested};
use session::{RenderOutcome, Session};

use self::components::{GroupEditor, Plotter};

/// How often pending dialogs are polled.
const POLL_INTERVAL: Duration = Duration::from_millis(100);
const CONTROLS_WIDTH: f32 = 420.0;

pub struct EguiApp {
    config: Config,
    session: Session,
    /// Result of the last pass, drawn every frame until the next pass.
    outcome: RenderOutcome,
    plotter: Plotter,
    group_editor: GroupEditor,
    new_palette_name: String,
    shortcuts_modal_open: bool,
    event_queue: EventQueue<Self>,
    /// Set by widgets which changed session state directly.
    needs_refresh: bool,
}

impl EguiApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self::with_config(config)
    }

    fn with_config(config: Config) -> Self {
        let session = Session::new(config.global_settings(), config.skip_rows);
        let mut app = Self {
            config,
            session,
            outcome: RenderOutcome::NoData,
            plotter: Plotter::new(),
            group_editor: GroupEditor::default(),
            new_palette_name: String::new(),
            shortcuts_modal_open: false,
            event_queue: EventQueue::new(),
            needs_refresh: false,
        };
        app.refresh();
        app
    }

    /// Run one pass over the session and keep its result for drawing.
    fn refresh(&mut self) {
        self.outcome = self.session.refresh();
        self.group_editor.sync(&self.session.groups);
        self.plotter.reset_bounds();
        self.needs_refresh = false;
        log::trace!("refreshed session, outcome: {}", outcome_name(&self.outcome));
    }

    fn reset_state(&mut self) {
        self.event_queue.discard_events();
        self.session = Session::new(self.config.global_settings(), self.config.skip_rows);
        self.new_palette_name.clear();
    }

    fn update_state(&mut self, ctx: &egui::Context) {
        let summary = EventQueue::run(self, |app| &mut app.event_queue);
        if summary.any_finished() || self.needs_refresh {
            self.refresh();
            ctx.request_repaint();
        }
        if !self.event_queue.is_empty() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }

    fn open_file_dialog(&mut self) {
        log::debug!("open dialog to select data files");
        let handle = std::thread::spawn(|| {
            rfd::FileDialog::new()
                .add_filter("Tables", &["csv", "tsv", "txt", "dat", "xlsx", "xlsm", "xls", "ods"])
                .pick_files()
        });
        self.event_queue
            .queue_event(Box::new(AddFilesRequested::new(Some(handle))));
    }

    fn open_export_dialog(&mut self) {
        log::debug!("open dialog to select svg plot path");
        let handle = std::thread::spawn(|| {
            rfd::FileDialog::new()
                .add_filter("SVG", &["svg"])
                .set_file_name("plot.svg")
                .save_file()
        });
        self.event_queue
            .queue_event(Box::new(SavePlotRequested::new(Some(handle))));
    }

    #[cfg(test)]
    fn group_editor_names(&self) -> Vec<&str> {
        self.group_editor.names().iter().map(|n| n.as_str()).collect()
    }
}

fn outcome_name(outcome: &RenderOutcome) -> &'static str {
    match outcome {
        RenderOutcome::NoData => "no data",
        RenderOutcome::Empty => "empty",
        RenderOutcome::Plot(_) => "plot",
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);

        let mut should_quit = false;

        // Handle keyboard input.
        ctx.input(|i| {
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            if i.key_pressed(egui::Key::F10) {
                should_quit = true;
            }
        });
        if ctx.input(|i| i.key_pressed(egui::Key::O) && i.modifiers.ctrl) {
            self.open_file_dialog();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::E) && i.modifiers.ctrl) {
            self.open_export_dialog();
        }

        // Files dropped onto the window.
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.event_queue.queue_event(Box::new(AddFiles::new(dropped)));
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(CONTROLS_WIDTH)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.controls(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Plot");
            match &self.outcome {
                RenderOutcome::NoData => {
                    ui.label("Add CSV or spreadsheet files to start plotting.");
                }
                RenderOutcome::Empty => {
                    ui.label(components::EMPTY_PLOT_MESSAGE);
                }
                RenderOutcome::Plot(plan) => {
                    egui::ScrollArea::both().show(ui, |ui| self.plotter.render(plan, ui));
                }
            }
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}

impl EguiApp {
    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Controls");
        if self.session.files.render(&mut self.event_queue, ui) {
            self.open_file_dialog();
        }

        // Everything else needs at least one loaded file.
        if self.outcome == RenderOutcome::NoData {
            return;
        }

        ui.separator();
        let mut changed = false;
        let loaded = self.session.files.loaded();
        if let Some((_, first_name, first_table)) = loaded.first() {
            changed |= self
                .session
                .globals
                .render(first_name, &first_table.column_names(), ui);
        }

        ui.separator();
        changed |= self.session.palettes.render(
            &mut self.new_palette_name,
            &mut self.event_queue,
            ui,
        );

        ui.separator();
        let session = &mut self.session;
        changed |= session.groups.render(
            &session.files,
            &mut session.file_settings,
            &mut self.group_editor,
            &mut self.event_queue,
            ui,
        );

        self.needs_refresh |= changed;
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Add Files…").clicked() {
                    self.open_file_dialog();
                    ui.close_menu();
                }
                if ui.button("Export SVG…").clicked() {
                    self.open_export_dialog();
                    ui.close_menu();
                }
                if ui.button("Reset Session").clicked() {
                    self.event_queue.queue_event(Box::new(ResetSession::new()));
                    ui.close_menu();
                }
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
            });
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("CTRL + O = Add Files");
                    ui.separator();
                    ui.label("CTRL + E = Export Plot as SVG");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                    ui.label("Files can also be dropped onto the window.");
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
