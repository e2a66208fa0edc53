use std::{path::PathBuf, thread::JoinHandle};

use derive_new::new;

use super::{components::FileId, session::RenderOutcome, EguiApp};
use app_core::event::{AppEvent, EventState};

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// Waits for the file dialog, then adds the picked files.
#[derive(new)]
pub struct AddFilesRequested {
    thread_handle: Option<JoinHandle<Option<Vec<PathBuf>>>>,
}

#[derive(new)]
pub struct AddFiles {
    paths: Vec<PathBuf>,
}

#[derive(new)]
pub struct RemoveFile {
    fid: FileId,
}

#[derive(new)]
pub struct SetSkipRows {
    skip_rows: usize,
}

/// Parse every upload again, e.g. after the files changed on disk.
#[derive(new)]
pub struct ReloadFiles {}

#[derive(new)]
pub struct MoveFile {
    fid: FileId,
    to_group: String,
}

#[derive(new)]
pub struct RenameGroup {
    index: usize,
    name: String,
}

#[derive(new)]
pub struct AddGroup {}

#[derive(new)]
pub struct ApplyPalette {}

#[derive(new)]
pub struct AddPaletteColour {}

#[derive(new)]
pub struct CreatePalette {
    name: String,
}

#[derive(new)]
pub struct SelectPalette {
    name: String,
}

/// Waits for the save dialog, then writes the current plot as SVG.
#[derive(new)]
pub struct SavePlotRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

#[derive(new)]
pub struct ResetSession {}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for AddFilesRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(paths)) => {
                    AddFiles::new(paths).apply(app)?;
                }
                Ok(None) => (),
                Err(err) => {
                    log::error!("unable to pick files: {:?}", err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for AddFiles {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        for path in self.paths.drain(..) {
            app.session.files.add_path(path);
        }
        Ok(EventState::Finished)
    }
}

impl AppEvent for RemoveFile {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        match app.session.files.remove(self.fid) {
            Some(_) => Ok(EventState::Finished),
            None => Err(format!("cannot remove {:?}: not found in registry", self.fid)),
        }
    }
}

impl AppEvent for SetSkipRows {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.files.set_skip_rows(self.skip_rows);
        Ok(EventState::Finished)
    }
}

impl AppEvent for ReloadFiles {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.files.reload_all();
        Ok(EventState::Finished)
    }
}

impl AppEvent for MoveFile {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.groups.move_file(self.fid, &self.to_group)?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for RenameGroup {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let result = app.session.groups.rename_group(self.index, &self.name);
        // The editor shows the name that was actually stored.
        app.group_editor.reset(&app.session.groups);
        result.map(|_| EventState::Finished)
    }
}

impl AppEvent for AddGroup {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let session = &mut app.session;
        session.groups.add_group(session.palettes.active_colors());
        Ok(EventState::Finished)
    }
}

impl AppEvent for ApplyPalette {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        let session = &mut app.session;
        session.groups.apply_palette(session.palettes.active_colors());
        Ok(EventState::Finished)
    }
}

impl AppEvent for AddPaletteColour {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.palettes.push_color();
        Ok(EventState::Finished)
    }
}

impl AppEvent for CreatePalette {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.palettes.create(&self.name)?;
        app.new_palette_name.clear();
        Ok(EventState::Finished)
    }
}

impl AppEvent for SelectPalette {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.session.palettes.select(&self.name)?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for SavePlotRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => {
                    let RenderOutcome::Plot(plan) = &app.outcome else {
                        return Err("nothing to export: no dataset is plotted".into());
                    };
                    super::components::save_svg(plan, &path, app.config.svg_size())?;
                }
                Ok(None) => (),
                Err(err) => {
                    log::error!("unable to save plot: {:?}", err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for ResetSession {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.reset_state();
        Ok(EventState::Finished)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use app_core::event::EventQueue;

    use super::*;
    use crate::Config;

    fn run(app: &mut EguiApp) -> app_core::event::RunSummary {
        let summary = EventQueue::run(app, |app| &mut app.event_queue);
        if summary.any_finished() {
            app.refresh();
        }
        summary
    }

    fn app_with_files(names: &[&str]) -> (EguiApp, tempfile::TempDir) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let paths = names
            .iter()
            .map(|name| {
                let path = dir.path().join(name);
                let mut file = std::fs::File::create(&path).unwrap();
                file.write_all(b"t,v\n0,1\n1,2\n").unwrap();
                path
            })
            .collect();
        let mut app = EguiApp::with_config(Config::default());
        app.event_queue.queue_event(Box::new(AddFiles::new(paths)));
        run(&mut app);
        (app, dir)
    }

    #[test]
    fn test_add_files_event_plots() {
        let (app, _dir) = app_with_files(&["a.csv", "b.csv"]);
        let RenderOutcome::Plot(plan) = &app.outcome else {
            panic!("expected a plot");
        };
        assert_eq!(plan.series.len(), 2);
        assert_eq!(app.group_editor_names(), vec!["a.csv", "b.csv"]);
    }

    #[test]
    fn test_move_and_rename_events() {
        let (mut app, _dir) = app_with_files(&["a.csv", "b.csv"]);
        let b = app.session.files.loaded()[1].0;
        app.event_queue
            .queue_event(Box::new(MoveFile::new(b, "a.csv".into())));
        app.event_queue
            .queue_event(Box::new(RenameGroup::new(0, "both".into())));
        let summary = run(&mut app);
        assert_eq!(summary.finished, 2);
        assert_eq!(app.session.groups.names().collect::<Vec<_>>(), vec!["both"]);
        assert_eq!(app.session.groups.move_selection(b), Some("both"));
        assert_eq!(app.group_editor_names(), vec!["both"]);
    }

    #[test]
    fn test_failed_rename_restores_editor() {
        let (mut app, _dir) = app_with_files(&["a.csv"]);
        app.event_queue
            .queue_event(Box::new(RenameGroup::new(0, " ".into())));
        let summary = run(&mut app);
        assert_eq!(summary.failed, 1);
        assert_eq!(app.group_editor_names(), vec!["a.csv"]);
    }

    #[test]
    fn test_palette_events() {
        let (mut app, _dir) = app_with_files(&["a.csv", "b.csv"]);
        app.new_palette_name = "Mono".into();
        app.event_queue
            .queue_event(Box::new(CreatePalette::new("Mono".into())));
        app.event_queue.queue_event(Box::new(ApplyPalette::new()));
        run(&mut app);
        assert!(app.new_palette_name.is_empty());
        assert!(app
            .session
            .groups
            .groups()
            .iter()
            .all(|grp| grp.color == "#1f77b4"));

        app.event_queue
            .queue_event(Box::new(SelectPalette::new("Default".into())));
        app.event_queue.queue_event(Box::new(AddGroup::new()));
        run(&mut app);
        let groups = app.session.groups.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[2].color, "#ff7f0e");
    }

    #[test]
    fn test_remove_and_reset() {
        let (mut app, _dir) = app_with_files(&["a.csv"]);
        let a = app.session.files.loaded()[0].0;
        app.event_queue.queue_event(Box::new(RemoveFile::new(a)));
        run(&mut app);
        assert_eq!(app.outcome, RenderOutcome::NoData);

        app.event_queue.queue_event(Box::new(RemoveFile::new(a)));
        assert_eq!(run(&mut app).failed, 1);

        app.event_queue.queue_event(Box::new(ResetSession::new()));
        run(&mut app);
        assert!(app.session.files.is_empty());
    }

    #[test]
    fn test_reset_drops_pending_file_dialog() {
        let (mut app, dir) = app_with_files(&["a.csv"]);
        let path = dir.path().join("a.csv");
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            rx.recv().ok();
            Some(vec![path])
        });
        app.event_queue
            .queue_event(Box::new(AddFilesRequested::new(Some(handle))));
        assert_eq!(run(&mut app).busy, 1);

        app.event_queue.queue_event(Box::new(ResetSession::new()));
        run(&mut app);
        tx.send(()).unwrap();
        run(&mut app);

        assert!(app.event_queue.is_empty());
        assert!(app.session.files.is_empty());
        assert_eq!(app.outcome, RenderOutcome::NoData);
    }
}
