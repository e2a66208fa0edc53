use std::collections::HashSet;

use crate::app::common::is_hex_color;
use crate::app::components::FileId;

use super::{ColourGroup, GroupBoard};

impl GroupBoard {
    pub fn groups(&self) -> &[ColourGroup] {
        &self.groups
    }

    pub fn get(&self, index: usize) -> Option<&ColourGroup> {
        self.groups.get(index)
    }

    pub fn group_of(&self, fid: FileId) -> Option<&ColourGroup> {
        self.groups.iter().find(|grp| grp.files.contains(&fid))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|grp| grp.name.as_str())
    }

    /// The group a file is about to be moved to, its own group by default.
    pub fn move_selection(&self, fid: FileId) -> Option<&str> {
        self.move_selection.get(&fid).map(|name| name.as_str())
    }

    /// Bring the groups in line with the files currently loaded.
    ///
    /// Files which vanished are dropped from every group, a file listed
    /// more than once only keeps its first entry and every file that is not
    /// in any group gets a group of its own, named after the file and
    /// coloured by cycling through `palette`. Empty groups are removed, except
    /// one which was just created by the user; that one is kept for exactly
    /// this pass.
    ///
    /// Running this twice on the same files changes nothing the second time
    /// (as long as no group was just created).
    pub fn reconcile(&mut self, current: &[(FileId, &str)], palette: &[String]) {
        let present: HashSet<FileId> = current.iter().map(|(fid, _)| *fid).collect();

        let mut seen = HashSet::new();
        for grp in self.groups.iter_mut() {
            grp.files
                .retain(|fid| present.contains(fid) && seen.insert(*fid));
        }

        for (fid, file_name) in current.iter() {
            if seen.contains(fid) {
                continue;
            }
            let color = palette_color(palette, self.groups.len());
            let name = self.unique_name(file_name, None);
            log::debug!("new group '{}' with colour {} for {:?}", name, color, fid);
            self.groups.push(ColourGroup::new(name, color, vec![*fid]));
            seen.insert(*fid);
        }

        self.groups.retain_mut(|grp| {
            let keep = !grp.files.is_empty() || grp.just_created;
            if !keep {
                log::debug!("pruning empty group '{}'", grp.name);
            }
            grp.just_created = false;
            keep
        });

        self.sync_move_selection();
    }

    /// Every grouped file has a selection naming an existing group; stale
    /// selections fall back to the owning group.
    fn sync_move_selection(&mut self) {
        let names: HashSet<&str> = self.groups.iter().map(|grp| grp.name.as_str()).collect();
        let mut selection = std::collections::BTreeMap::new();
        for grp in self.groups.iter() {
            for fid in grp.files.iter() {
                let target = match self.move_selection.get(fid) {
                    Some(name) if names.contains(name.as_str()) => name.clone(),
                    _ => grp.name.clone(),
                };
                selection.insert(*fid, target);
            }
        }
        self.move_selection = selection;
    }

    /// Move a file to the end of the group named `target`.
    pub fn move_file(&mut self, fid: FileId, target: &str) -> Result<(), String> {
        let from = self
            .groups
            .iter()
            .position(|grp| grp.files.contains(&fid))
            .ok_or_else(|| format!("file {fid:?} is not in any group"))?;
        let to = self
            .groups
            .iter()
            .position(|grp| grp.name == target)
            .ok_or_else(|| format!("no group named '{target}'"))?;
        if from == to {
            return Ok(());
        }
        self.groups[from].files.retain(|id| *id != fid);
        self.groups[to].files.push(fid);
        self.move_selection.insert(fid, target.to_string());
        log::debug!(
            "moved {:?} from '{}' to '{}'",
            fid,
            self.groups[from].name,
            target
        );
        Ok(())
    }

    /// Rename a group and repoint every move selection naming it. A name that
    /// is already taken gets a numbered suffix; the final name is returned.
    pub fn rename_group(&mut self, index: usize, name: &str) -> Result<String, String> {
        let name = name.trim();
        if name.is_empty() {
            return Err("group name must not be empty".into());
        }
        let Some(old_name) = self.groups.get(index).map(|grp| grp.name.clone()) else {
            return Err(format!("no group at position {index}"));
        };
        if old_name == name {
            return Ok(old_name);
        }
        let new_name = self.unique_name(name, Some(index));
        for target in self.move_selection.values_mut() {
            if *target == old_name {
                new_name.clone_into(target);
            }
        }
        new_name.clone_into(&mut self.groups[index].name);
        log::debug!("renamed group '{}' to '{}'", old_name, new_name);
        Ok(new_name)
    }

    /// Append an empty group, coloured with the first palette colour no
    /// group uses yet. Returns its position.
    pub fn add_group(&mut self, palette: &[String]) -> usize {
        let n = self.groups.len();
        let color = palette
            .iter()
            .find(|color| !self.groups.iter().any(|grp| &grp.color == *color))
            .cloned()
            .unwrap_or_else(|| palette_color(palette, n));
        let name = self.unique_name(&format!("Group {}", n + 1), None);

        // Only the newest group is spared from pruning.
        for grp in self.groups.iter_mut() {
            grp.just_created = false;
        }
        let mut grp = ColourGroup::new(name, color, Vec::new());
        grp.just_created = true;
        self.groups.push(grp);
        n
    }

    /// Group `i` gets `palette[i mod len]`.
    pub fn apply_palette(&mut self, palette: &[String]) {
        for (i, grp) in self.groups.iter_mut().enumerate() {
            grp.color = palette_color(palette, i);
        }
    }

    pub fn set_group_color(&mut self, index: usize, hex: &str) -> Result<(), String> {
        if !is_hex_color(hex) {
            return Err(format!("'{hex}' is not a hex colour"));
        }
        let grp = self
            .groups
            .get_mut(index)
            .ok_or_else(|| format!("no group at position {index}"))?;
        hex.clone_into(&mut grp.color);
        Ok(())
    }

    /// `base`, or `base (2)`, `base (3)`, ... whichever no other group uses.
    fn unique_name(&self, base: &str, skip: Option<usize>) -> String {
        let taken = |candidate: &str| {
            self.groups
                .iter()
                .enumerate()
                .any(|(i, grp)| Some(i) != skip && grp.name == candidate)
        };
        if !taken(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

fn palette_color(palette: &[String], i: usize) -> String {
    if palette.is_empty() {
        return super::super::palettes::TAB10[i % 10].to_string();
    }
    palette[i % palette.len()].clone()
}
