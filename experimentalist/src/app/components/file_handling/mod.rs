mod logic;
mod ui;

use std::path::PathBuf;

use table_reader::Table;

/// Stable identifier of an upload. File names are only used for display,
/// two uploads with the same name never share settings or group membership.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FileId(pub(crate) usize);

/// A file the user added, with its parsed table or the reason it failed.
#[derive(Debug)]
pub struct Upload {
    pub path: PathBuf,
    pub table: Result<Table, String>,
}

/// All uploads in the order they were added.
#[derive(Debug, Default)]
pub struct FileRegistry {
    uploads: Vec<(FileId, Upload)>,
    next_id: FileId,
    skip_rows: usize,
}

impl FileId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Upload {
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unreadable filename")
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref().ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.table.as_ref().err().map(|err| err.as_str())
    }
}

impl FileRegistry {
    pub const MAX_SKIP_ROWS: usize = 1000;

    pub fn new(skip_rows: usize) -> Self {
        Self {
            skip_rows: skip_rows.min(Self::MAX_SKIP_ROWS),
            ..Default::default()
        }
    }

    pub fn skip_rows(&self) -> usize {
        self.skip_rows
    }
}
