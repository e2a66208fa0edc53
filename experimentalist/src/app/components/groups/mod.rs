mod logic;
mod ui;

use std::collections::BTreeMap;

use super::FileId;

/// A named bucket of files sharing a default plot colour.
#[derive(Clone, Debug, PartialEq)]
pub struct ColourGroup {
    pub name: String,
    pub color: String,
    pub files: Vec<FileId>,
    /// Set for a group added by the user. Such a group survives the next
    /// reconciliation even while empty.
    just_created: bool,
}

/// The colour groups in display order, plus the "move to" selection of
/// every grouped file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupBoard {
    groups: Vec<ColourGroup>,
    move_selection: BTreeMap<FileId, String>,
}

impl ColourGroup {
    fn new(name: String, color: String, files: Vec<FileId>) -> Self {
        Self {
            name,
            color,
            files,
            just_created: false,
        }
    }

    pub fn is_just_created(&self) -> bool {
        self.just_created
    }
}

/// Text buffers of the group name editors, committed on focus loss.
#[derive(Debug, Default)]
pub struct GroupEditor {
    name_buffers: Vec<String>,
    /// Stored names as of the last sync.
    synced: Vec<String>,
}

impl GroupEditor {
    /// Bring the buffers in line with the stored names. Buffers whose stored
    /// name did not change keep any text that was not committed yet.
    pub fn sync(&mut self, board: &GroupBoard) {
        let groups = board.groups();
        self.name_buffers.resize(groups.len(), String::new());
        for (i, grp) in groups.iter().enumerate() {
            if self.synced.get(i) != Some(&grp.name) {
                self.name_buffers[i] = grp.name.clone();
            }
        }
        self.synced = groups.iter().map(|grp| grp.name.clone()).collect();
    }

    /// Overwrite every buffer with the stored name.
    pub fn reset(&mut self, board: &GroupBoard) {
        self.synced.clear();
        self.sync(board);
    }

    pub fn names(&self) -> &[String] {
        &self.name_buffers
    }
}
