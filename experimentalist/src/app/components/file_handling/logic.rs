use std::path::PathBuf;

use table_reader::Table;

use super::{FileId, FileRegistry, Upload};

impl FileRegistry {
    /// Parse the file at `path` and register it. A path that is already
    /// registered is parsed again and keeps its ID.
    pub fn add_path(&mut self, path: PathBuf) -> FileId {
        let table = table_reader::read_path(&path, self.skip_rows);
        if let Err(err) = &table {
            log::warn!("could not load {:?}: {}", path, err);
        }
        self.insert(path, table)
    }

    /// Register an already parsed table. Replaces the table of an existing
    /// upload with the same path.
    pub fn insert(&mut self, path: PathBuf, table: Result<Table, String>) -> FileId {
        if let Some((fid, upload)) = self.uploads.iter_mut().find(|(_, up)| up.path == path) {
            log::debug!("replacing table of {:?} ({:?})", path, fid);
            upload.table = table;
            return *fid;
        }
        let fid = self.next_id;
        self.next_id = FileId(fid.0 + 1);
        log::debug!("registering {:?} as {:?}", path, fid);
        self.uploads.push((fid, Upload { path, table }));
        fid
    }

    pub fn remove(&mut self, fid: FileId) -> Option<Upload> {
        let pos = self.uploads.iter().position(|(id, _)| *id == fid)?;
        let (_, upload) = self.uploads.remove(pos);
        log::debug!("removed {:?} ({:?})", upload.path, fid);
        Some(upload)
    }

    /// Change the number of rows skipped before the header. Returns whether
    /// the value changed, in which case every upload was parsed again.
    pub fn set_skip_rows(&mut self, skip_rows: usize) -> bool {
        let skip_rows = skip_rows.min(Self::MAX_SKIP_ROWS);
        if skip_rows == self.skip_rows {
            return false;
        }
        self.skip_rows = skip_rows;
        self.reload_all();
        true
    }

    /// Parse every upload again from disk.
    pub fn reload_all(&mut self) {
        let skip_rows = self.skip_rows;
        for (_, upload) in self.uploads.iter_mut() {
            upload.table = table_reader::read_path(&upload.path, skip_rows);
        }
    }

    pub fn get(&self, fid: FileId) -> Option<&Upload> {
        self.uploads
            .iter()
            .find(|(id, _)| *id == fid)
            .map(|(_, upload)| upload)
    }

    pub fn table(&self, fid: FileId) -> Option<&Table> {
        self.get(fid).and_then(|upload| upload.table())
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, &Upload)> {
        self.uploads.iter().map(|(fid, upload)| (*fid, upload))
    }

    /// Uploads with a table, in upload order.
    pub fn loaded(&self) -> Vec<(FileId, &str, &Table)> {
        self.iter()
            .filter_map(|(fid, upload)| upload.table().map(|table| (fid, upload.file_name(), table)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }
}
