//! The state of one plotting session and the pass that turns it into a plot.

use std::collections::HashMap;

use super::components::{
    build_plan, FileId, FileRegistry, FileSettings, GlobalSettings, GroupBoard, PaletteBook,
    PlotPlan,
};

/// What the plot area shows after a pass.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// No file is loaded; only the upload controls are shown.
    NoData,
    /// Files are loaded but none of them can be drawn.
    Empty,
    Plot(PlotPlan),
}

/// Files, groups, palettes and settings. Lives as long as the process.
#[derive(Debug, Default)]
pub struct Session {
    pub files: FileRegistry,
    pub groups: GroupBoard,
    pub palettes: PaletteBook,
    pub globals: GlobalSettings,
    pub file_settings: HashMap<FileId, FileSettings>,
}

impl Session {
    pub fn new(globals: GlobalSettings, skip_rows: usize) -> Self {
        Self {
            files: FileRegistry::new(skip_rows),
            globals,
            ..Default::default()
        }
    }

    /// Run one full pass: reconcile the groups with the loaded files, bring
    /// the per-file and global settings in line, then resolve the plot.
    pub fn refresh(&mut self) -> RenderOutcome {
        let loaded = self.files.loaded();
        if loaded.is_empty() {
            return RenderOutcome::NoData;
        }

        let current: Vec<(FileId, &str)> = loaded.iter().map(|(fid, name, _)| (*fid, *name)).collect();
        self.groups
            .reconcile(&current, self.palettes.active_colors());

        self.file_settings
            .retain(|fid, _| current.iter().any(|(id, _)| id == fid));
        for (fid, name, table) in loaded.iter() {
            let group_color = self
                .groups
                .group_of(*fid)
                .map(|grp| grp.color.as_str())
                .unwrap_or(self.globals.color.as_str());
            let settings = self
                .file_settings
                .entry(*fid)
                .or_insert_with(|| FileSettings::new(name, group_color));
            settings.sync_columns(&table.column_names());
        }

        self.globals.clamp();
        if let Some((_, _, first)) = loaded.first() {
            self.globals.sync_columns(&first.column_names());
        }

        match build_plan(&self.groups, &self.files, &self.file_settings, &self.globals) {
            Some(plan) => {
                log::debug!(
                    "{} series from {} files in {} groups",
                    plan.series.len(),
                    current.len(),
                    self.groups.groups().len()
                );
                RenderOutcome::Plot(plan)
            }
            None => RenderOutcome::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn add(session: &mut Session, name: &str, raw: &str) -> FileId {
        session
            .files
            .insert(PathBuf::from(name), table_reader::read_delimited_str(raw, 0))
    }

    #[test]
    fn test_nothing_loaded() {
        let mut session = Session::default();
        assert_eq!(session.refresh(), RenderOutcome::NoData);
        add(&mut session, "broken.csv", "");
        assert_eq!(session.refresh(), RenderOutcome::NoData);
        assert!(session.groups.groups().is_empty());
    }

    #[test]
    fn test_two_files_two_groups() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut session = Session::default();
        let a = add(&mut session, "a.csv", "t,v\n0,1\n1,2\n");
        let b = add(&mut session, "b.csv", "t,v\n0,2\n1,3\n");

        let RenderOutcome::Plot(plan) = session.refresh() else {
            panic!("expected a plot");
        };
        let groups = session.groups.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].name.as_str(), groups[0].color.as_str()), ("a.csv", "#1f77b4"));
        assert_eq!((groups[1].name.as_str(), groups[1].color.as_str()), ("b.csv", "#ff7f0e"));
        assert_eq!(session.globals.x_column.as_deref(), Some("t"));
        assert_eq!(session.globals.y_column.as_deref(), Some("v"));

        let labels: Vec<_> = plan.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["a.csv", "b.csv"]);
        assert_eq!(plan.series[0].file, a);
        assert_eq!(plan.series[1].file, b);
        assert_eq!(session.file_settings[&b].color.value, "#ff7f0e");
    }

    #[test]
    fn test_move_prunes_emptied_group() {
        let mut session = Session::default();
        let a = add(&mut session, "a.csv", "t,v\n0,1\n");
        let b = add(&mut session, "b.csv", "t,v\n0,2\n");
        session.refresh();

        session.groups.move_file(b, "a.csv").unwrap();
        let RenderOutcome::Plot(plan) = session.refresh() else {
            panic!("expected a plot");
        };
        let groups = session.groups.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "a.csv");
        assert_eq!(groups[0].files, vec![a, b]);
        assert!(plan.series.iter().all(|s| s.style.color == "#1f77b4"));
    }

    #[test]
    fn test_all_hidden_is_empty() {
        let mut session = Session::default();
        let a = add(&mut session, "a.csv", "t,v\n0,1\n");
        session.refresh();
        session.file_settings.get_mut(&a).unwrap().show = false;
        assert_eq!(session.refresh(), RenderOutcome::Empty);
    }

    #[test]
    fn test_removed_file_leaves_groups_and_settings() {
        let mut session = Session::default();
        let a = add(&mut session, "a.csv", "t,v\n0,1\n");
        let b = add(&mut session, "b.csv", "x,y\n0,1\n");
        session.refresh();
        assert_eq!(session.globals.x_column.as_deref(), Some("t"));

        session.files.remove(a);
        session.refresh();
        assert!(!session.file_settings.contains_key(&a));
        assert_eq!(session.groups.names().collect::<Vec<_>>(), vec!["b.csv"]);
        // Global columns follow the new first file.
        assert_eq!(session.globals.x_column.as_deref(), Some("x"));
        assert_eq!(session.groups.group_of(b).unwrap().name, "b.csv");
    }

    #[test]
    fn test_refresh_without_changes_keeps_state() {
        let mut session = Session::default();
        add(&mut session, "a.csv", "t,v\n0,1\n");
        add(&mut session, "b.csv", "t,v\n0,1\n");
        let first = session.refresh();
        let groups = session.groups.clone();
        let settings = session.file_settings.clone();
        assert_eq!(session.refresh(), first);
        assert_eq!(session.groups, groups);
        assert_eq!(session.file_settings, settings);
    }
}
